use std::collections::{HashMap, HashSet};

use cancha_core::{FacilityId, SlotId, TimeSlot};
use chrono::NaiveDate;

type SlotKey = (FacilityId, NaiveDate);

/// Bookable slots per facility and date, plus the player's current pick.
///
/// The catalog is a read model: it never flips `available`. Claiming a slot
/// is the job of a [`cancha_core::SlotRepository`].
#[derive(Debug, Default)]
pub struct SlotCatalog {
    slots: HashMap<SlotKey, Vec<TimeSlot>>,
    index: HashMap<SlotId, SlotKey>,
    selected: Option<SlotId>,
}

impl SlotCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog holding a single facility/date listing.
    pub fn from_slots(
        facility_id: FacilityId,
        date: NaiveDate,
        slots: Vec<TimeSlot>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        catalog.insert(facility_id, date, slots)?;
        Ok(catalog)
    }

    /// Add slots for a facility/date. Rejects the whole batch if any id is
    /// already present in the catalog or repeated within the batch.
    pub fn insert(
        &mut self,
        facility_id: FacilityId,
        date: NaiveDate,
        slots: Vec<TimeSlot>,
    ) -> Result<(), CatalogError> {
        {
            let mut seen = HashSet::new();
            for slot in &slots {
                if self.index.contains_key(&slot.id) || !seen.insert(&slot.id) {
                    return Err(CatalogError::DuplicateSlot(slot.id.clone()));
                }
            }
        }

        let key = (facility_id, date);
        for slot in &slots {
            self.index.insert(slot.id.clone(), key.clone());
        }

        let listing = self.slots.entry(key).or_default();
        listing.extend(slots);
        listing.sort_by_key(|slot| slot.time);

        Ok(())
    }

    /// Slots for a facility on a date, earliest first. Unknown pairs list
    /// nothing.
    pub fn list_slots(&self, facility_id: &FacilityId, date: NaiveDate) -> &[TimeSlot] {
        self.slots
            .get(&(facility_id.clone(), date))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn get(&self, slot_id: &SlotId) -> Option<&TimeSlot> {
        let key = self.index.get(slot_id)?;
        self.slots.get(key)?.iter().find(|slot| &slot.id == slot_id)
    }

    /// Make `slot_id` the current selection.
    ///
    /// Taken slots always fail with [`CatalogError::SlotUnavailable`]; a
    /// failed selection leaves the previous one in place.
    pub fn select_slot(&mut self, slot_id: &SlotId) -> Result<&TimeSlot, CatalogError> {
        match self.get(slot_id) {
            None => return Err(CatalogError::SlotNotFound(slot_id.clone())),
            Some(slot) if !slot.available => {
                return Err(CatalogError::SlotUnavailable(slot_id.clone()))
            }
            Some(_) => {}
        }

        self.selected = Some(slot_id.clone());
        self.get(slot_id)
            .ok_or_else(|| CatalogError::SlotNotFound(slot_id.clone()))
    }

    pub fn selected(&self) -> Option<&TimeSlot> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Slot not found: {0}")]
    SlotNotFound(SlotId),

    #[error("Slot unavailable: {0}")]
    SlotUnavailable(SlotId),

    #[error("Duplicate slot id: {0}")]
    DuplicateSlot(SlotId),
}
