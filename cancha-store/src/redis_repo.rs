use async_trait::async_trait;
use cancha_core::{RepositoryError, SlotId, SlotLock};
use tracing::{info, warn};

#[derive(Clone)]
pub struct RedisClient {
    client: redis::Client,
}

impl RedisClient {
    pub fn new(connection_string: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(connection_string)?;
        Ok(Self { client })
    }

    pub async fn acquire_slot_lock(&self, slot_id: &str, holder: &str, ttl_seconds: u64) -> Result<bool, redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = slot_lock_key(slot_id);

        // SET NX: Only set if key does not exist
        let result: Option<String> = redis::cmd("SET")
            .arg(&key)
            .arg(holder)
            .arg("NX")
            .arg("EX")
            .arg(ttl_seconds)
            .query_async(&mut conn)
            .await?;

        Ok(result.is_some())
    }

    /// Delete the lock only if `holder` still owns it. Returns whether a key was removed.
    pub async fn release_slot_lock(&self, slot_id: &str, holder: &str) -> Result<bool, redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let script = redis::Script::new(RELEASE_IF_HOLDER);

        let removed: i64 = script
            .key(slot_lock_key(slot_id))
            .arg(holder)
            .invoke_async(&mut conn)
            .await?;

        Ok(removed == 1)
    }
}

// GET and DEL must run atomically or an expired lock re-taken by another
// holder could be deleted.
const RELEASE_IF_HOLDER: &str = r#"
    if redis.call("GET", KEYS[1]) == ARGV[1] then
        return redis.call("DEL", KEYS[1])
    else
        return 0
    end
"#;

pub fn slot_lock_key(slot_id: &str) -> String {
    format!("slot:{}:lock", slot_id)
}

/// [`SlotLock`] shared by every service instance pointed at the same Redis
pub struct RedisSlotLock {
    client: RedisClient,
    ttl_seconds: u64,
}

impl RedisSlotLock {
    pub fn new(client: RedisClient, ttl_seconds: u64) -> Self {
        Self { client, ttl_seconds }
    }
}

#[async_trait]
impl SlotLock for RedisSlotLock {
    async fn acquire(&self, slot_id: &SlotId, holder: &str) -> Result<bool, RepositoryError> {
        let acquired = self
            .client
            .acquire_slot_lock(slot_id.as_str(), holder, self.ttl_seconds)
            .await
            .map_err(|e| {
                warn!("Slot lock on {} failed: {}", slot_id, e);
                RepositoryError::Backend(e.to_string())
            })?;

        if acquired {
            info!("Slot lock acquired: {} -> {}", slot_id, holder);
        }
        Ok(acquired)
    }

    async fn release(&self, slot_id: &SlotId, holder: &str) -> Result<(), RepositoryError> {
        let removed = self
            .client
            .release_slot_lock(slot_id.as_str(), holder)
            .await
            .map_err(|e| RepositoryError::Backend(e.to_string()))?;

        if removed {
            info!("Slot lock released: {} by {}", slot_id, holder);
        }
        Ok(())
    }
}
