pub mod booking;
pub mod facility;
pub mod repository;
pub mod slot;

pub use booking::BookingRequest;
pub use facility::{Facility, FacilityId, FieldType};
pub use repository::{FacilityRepository, RepositoryError, SlotLock, SlotRepository};
pub use slot::{SlotId, TimeSlot};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid field type: {0}")]
    InvalidFieldType(String),
    #[error("Invalid slot time: {0}")]
    InvalidSlotTime(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
