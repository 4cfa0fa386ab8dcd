pub mod app_config;
pub mod memory_repo;
pub mod redis_repo;
pub mod seed;

pub use memory_repo::{InMemoryFacilityRepository, InMemorySlotRepository};
pub use redis_repo::{RedisClient, RedisSlotLock};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed seed data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}
