use async_trait::async_trait;
use chrono::NaiveDate;

use crate::facility::{Facility, FacilityId};
use crate::slot::{SlotId, TimeSlot};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Facility not found: {0}")]
    FacilityNotFound(FacilityId),

    #[error("Slot not found: {0}")]
    SlotNotFound(SlotId),

    #[error("Slot unavailable: {0}")]
    SlotUnavailable(SlotId),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Read access to facility reference data
#[async_trait]
pub trait FacilityRepository: Send + Sync {
    async fn list_facilities(&self) -> Result<Vec<Facility>, RepositoryError>;

    async fn get_facility(&self, id: &FacilityId) -> Result<Option<Facility>, RepositoryError>;
}

/// Slot storage and claim arbitration.
///
/// `claim_slot` is a compare-and-set on the slot inside one facility/date
/// listing: it flips `available` from `true` to `false` and must let exactly
/// one of any number of concurrent callers succeed. Losers get
/// [`RepositoryError::SlotUnavailable`]. Slot ids are only unique within a
/// listing, so a slot is never looked up by id alone.
#[async_trait]
pub trait SlotRepository: Send + Sync {
    async fn list_slots(
        &self,
        facility_id: &FacilityId,
        date: NaiveDate,
    ) -> Result<Vec<TimeSlot>, RepositoryError>;

    async fn claim_slot(
        &self,
        facility_id: &FacilityId,
        date: NaiveDate,
        slot_id: &SlotId,
    ) -> Result<TimeSlot, RepositoryError>;
}

/// Cross-process hold on a slot, taken before the repository claim so that
/// several service instances sharing one store cannot interleave claims.
#[async_trait]
pub trait SlotLock: Send + Sync {
    /// `Ok(true)` if `holder` now owns the slot, `Ok(false)` if someone
    /// else already does.
    async fn acquire(&self, slot_id: &SlotId, holder: &str) -> Result<bool, RepositoryError>;

    /// Drop the hold, but only while `holder` still owns it.
    async fn release(&self, slot_id: &SlotId, holder: &str) -> Result<(), RepositoryError>;
}
