use std::collections::HashMap;

use async_trait::async_trait;
use cancha_core::{
    Facility, FacilityId, FacilityRepository, RepositoryError, SlotId, SlotRepository, TimeSlot,
};
use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::info;

use crate::seed::SeedListing;

/// Facility reference data held in memory
pub struct InMemoryFacilityRepository {
    facilities: Vec<Facility>,
}

impl InMemoryFacilityRepository {
    pub fn new(facilities: Vec<Facility>) -> Self {
        Self { facilities }
    }
}

#[async_trait]
impl FacilityRepository for InMemoryFacilityRepository {
    async fn list_facilities(&self) -> Result<Vec<Facility>, RepositoryError> {
        Ok(self.facilities.clone())
    }

    async fn get_facility(&self, id: &FacilityId) -> Result<Option<Facility>, RepositoryError> {
        Ok(self.facilities.iter().find(|f| &f.id == id).cloned())
    }
}

/// Slot listings held in memory. Claims are serialised by the write lock,
/// which makes `claim_slot` a compare-and-set.
#[derive(Default)]
pub struct InMemorySlotRepository {
    listings: RwLock<HashMap<(FacilityId, NaiveDate), Vec<TimeSlot>>>,
}

impl InMemorySlotRepository {
    pub fn with_slots(listings: Vec<SeedListing>) -> Self {
        let mut map: HashMap<(FacilityId, NaiveDate), Vec<TimeSlot>> = HashMap::new();
        for listing in listings {
            map.entry((listing.facility_id, listing.date))
                .or_default()
                .extend(listing.slots);
        }
        Self {
            listings: RwLock::new(map),
        }
    }
}

#[async_trait]
impl SlotRepository for InMemorySlotRepository {
    async fn list_slots(
        &self,
        facility_id: &FacilityId,
        date: NaiveDate,
    ) -> Result<Vec<TimeSlot>, RepositoryError> {
        let listings = self.listings.read().await;
        Ok(listings
            .get(&(facility_id.clone(), date))
            .cloned()
            .unwrap_or_default())
    }

    async fn claim_slot(
        &self,
        facility_id: &FacilityId,
        date: NaiveDate,
        slot_id: &SlotId,
    ) -> Result<TimeSlot, RepositoryError> {
        let mut listings = self.listings.write().await;
        let slot = listings
            .get_mut(&(facility_id.clone(), date))
            .and_then(|slots| slots.iter_mut().find(|slot| &slot.id == slot_id))
            .ok_or_else(|| RepositoryError::SlotNotFound(slot_id.clone()))?;

        if !slot.available {
            return Err(RepositoryError::SlotUnavailable(slot_id.clone()));
        }

        slot.available = false;
        info!("Slot {} claimed", slot_id);
        Ok(slot.clone())
    }
}
