use std::sync::Arc;

use cancha_catalog::{CatalogError, FilterCriteria, FilterEngine, SlotCatalog};
use cancha_core::{
    BookingRequest, Facility, FacilityId, FacilityRepository, RepositoryError, SlotId, SlotLock,
    SlotRepository, TimeSlot,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::cancellation::CancellationPolicyEvaluator;
use crate::manager::{BookingError, BookingManager};
use crate::models::Booking;
use crate::validation::{BookingField, BookingRequestValidator, ValidationError, ValidationErrorKind};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Booking form plus the slot the player picked
#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmBookingCommand {
    pub facility_id: FacilityId,
    pub slot_id: SlotId,
    #[serde(flatten)]
    pub request: BookingRequest,
}

#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error("Booking request invalid ({} errors)", .0.len())]
    Invalid(Vec<ValidationError>),

    #[error("Facility not found: {0}")]
    FacilityNotFound(FacilityId),

    #[error("Slot not found: {0}")]
    SlotNotFound(SlotId),

    #[error("Slot unavailable: {0}")]
    SlotUnavailable(SlotId),

    #[error(transparent)]
    Booking(#[from] BookingError),

    #[error("Catalog inconsistent: {0}")]
    Catalog(String),

    #[error("Storage failure: {0}")]
    Storage(String),
}

impl From<RepositoryError> for OrchestratorError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::FacilityNotFound(id) => OrchestratorError::FacilityNotFound(id),
            RepositoryError::SlotNotFound(id) => OrchestratorError::SlotNotFound(id),
            RepositoryError::SlotUnavailable(id) => OrchestratorError::SlotUnavailable(id),
            RepositoryError::Backend(msg) => OrchestratorError::Storage(msg),
        }
    }
}

impl From<CatalogError> for OrchestratorError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::SlotNotFound(id) => OrchestratorError::SlotNotFound(id),
            CatalogError::SlotUnavailable(id) => OrchestratorError::SlotUnavailable(id),
            CatalogError::DuplicateSlot(id) => {
                OrchestratorError::Catalog(format!("duplicate slot id {}", id))
            }
        }
    }
}

/// Runs the booking flow end to end:
/// filter → list slots → validate → select → lock → claim → confirm.
///
/// Facility and slot data come from the injected repositories; nothing here
/// holds module-level fixtures.
pub struct BookingOrchestrator {
    facilities: Arc<dyn FacilityRepository>,
    slots: Arc<dyn SlotRepository>,
    slot_lock: Option<Arc<dyn SlotLock>>,
    filter_engine: FilterEngine,
    validator: BookingRequestValidator,
    manager: Mutex<BookingManager>,
}

impl BookingOrchestrator {
    pub fn new(
        facilities: Arc<dyn FacilityRepository>,
        slots: Arc<dyn SlotRepository>,
        evaluator: CancellationPolicyEvaluator,
    ) -> Self {
        Self {
            facilities,
            slots,
            slot_lock: None,
            filter_engine: FilterEngine::default(),
            validator: BookingRequestValidator::default(),
            manager: Mutex::new(BookingManager::new(evaluator)),
        }
    }

    pub fn with_slot_lock(mut self, slot_lock: Arc<dyn SlotLock>) -> Self {
        self.slot_lock = Some(slot_lock);
        self
    }

    pub fn with_filter_engine(mut self, filter_engine: FilterEngine) -> Self {
        self.filter_engine = filter_engine;
        self
    }

    pub async fn search(&self, criteria: &FilterCriteria) -> Result<Vec<Facility>, OrchestratorError> {
        let facilities = self.facilities.list_facilities().await?;
        Ok(self
            .filter_engine
            .filter(&facilities, criteria)
            .into_iter()
            .cloned()
            .collect())
    }

    pub async fn get_facility(&self, facility_id: &FacilityId) -> Result<Facility, OrchestratorError> {
        self.facilities
            .get_facility(facility_id)
            .await?
            .ok_or_else(|| OrchestratorError::FacilityNotFound(facility_id.clone()))
    }

    /// Slots for a facility on a date, earliest first
    pub async fn list_slots(
        &self,
        facility_id: &FacilityId,
        date: NaiveDate,
    ) -> Result<Vec<TimeSlot>, OrchestratorError> {
        let catalog = self.load_catalog(facility_id, date).await?;
        Ok(catalog.list_slots(facility_id, date).to_vec())
    }

    pub async fn confirm_booking(&self, command: ConfirmBookingCommand) -> Result<Booking, OrchestratorError> {
        let ConfirmBookingCommand {
            facility_id,
            slot_id,
            request,
        } = command;

        self.validator
            .validate(&request)
            .map_err(OrchestratorError::Invalid)?;
        let date = parse_date(&request.date)?;
        let time = TimeSlot::parse_time(&request.time).map_err(|_| {
            invalid(BookingField::Time, ValidationErrorKind::InvalidFormat, "Time must be HH:MM")
        })?;

        let facility = self.get_facility(&facility_id).await?;
        let mut catalog = self.load_catalog(&facility_id, date).await?;
        let selected = catalog.select_slot(&slot_id)?;
        if selected.time != time {
            return Err(invalid(
                BookingField::Time,
                ValidationErrorKind::InvalidFormat,
                format!("Time does not match the selected slot ({})", selected.time_label()),
            ));
        }

        let holder = match &self.slot_lock {
            Some(lock) => {
                let holder = Uuid::new_v4().to_string();
                if !lock.acquire(&slot_id, &holder).await? {
                    warn!("Slot {} already locked by another booking", slot_id);
                    return Err(OrchestratorError::SlotUnavailable(slot_id));
                }
                Some(holder)
            }
            None => None,
        };

        let claimed = match self.slots.claim_slot(&facility_id, date, &slot_id).await {
            Ok(slot) => slot,
            Err(e) => {
                warn!("Claim on slot {} failed: {}", slot_id, e);
                if let (Some(lock), Some(holder)) = (&self.slot_lock, &holder) {
                    if let Err(release_err) = lock.release(&slot_id, holder).await {
                        warn!("Slot lock on {} not released: {}", slot_id, release_err);
                    }
                }
                return Err(e.into());
            }
        };
        info!("Slot claimed: {} for facility {}", slot_id, facility_id);

        let mut manager = self.manager.lock().await;
        Ok(manager.confirm(&facility, &claimed, date, &request))
    }

    pub async fn get_booking(&self, booking_id: &Uuid) -> Option<Booking> {
        self.manager.lock().await.get_booking(booking_id).cloned()
    }

    pub async fn cancel_booking(
        &self,
        booking_id: &Uuid,
        cancelled_at: DateTime<Utc>,
    ) -> Result<Booking, OrchestratorError> {
        let mut manager = self.manager.lock().await;
        Ok(manager.cancel_booking(booking_id, cancelled_at)?)
    }

    /// Owner view: every booking taken on a facility
    pub async fn facility_bookings(&self, facility_id: &FacilityId) -> Result<Vec<Booking>, OrchestratorError> {
        self.get_facility(facility_id).await?;
        Ok(self.manager.lock().await.list_for_facility(facility_id))
    }

    async fn load_catalog(&self, facility_id: &FacilityId, date: NaiveDate) -> Result<SlotCatalog, OrchestratorError> {
        self.get_facility(facility_id).await?;
        let slots = self.slots.list_slots(facility_id, date).await?;
        Ok(SlotCatalog::from_slots(facility_id.clone(), date, slots)?)
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, OrchestratorError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        invalid(BookingField::Date, ValidationErrorKind::InvalidFormat, "Date must be YYYY-MM-DD")
    })
}

fn invalid(field: BookingField, kind: ValidationErrorKind, message: impl Into<String>) -> OrchestratorError {
    OrchestratorError::Invalid(vec![ValidationError::new(field, kind, message)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use cancha_catalog::PriceRange;
    use cancha_store::memory_repo::{InMemoryFacilityRepository, InMemorySlotRepository};
    use cancha_store::seed::{self, SeedListing};
    use std::collections::HashMap;

    /// Single-process stand-in for the Redis lock
    #[derive(Default)]
    struct LocalSlotLock {
        holders: std::sync::Mutex<HashMap<SlotId, String>>,
    }

    #[async_trait::async_trait]
    impl SlotLock for LocalSlotLock {
        async fn acquire(&self, slot_id: &SlotId, holder: &str) -> Result<bool, RepositoryError> {
            let mut holders = self.holders.lock().unwrap();
            if holders.contains_key(slot_id) {
                return Ok(false);
            }
            holders.insert(slot_id.clone(), holder.to_string());
            Ok(true)
        }

        async fn release(&self, slot_id: &SlotId, holder: &str) -> Result<(), RepositoryError> {
            let mut holders = self.holders.lock().unwrap();
            if holders.get(slot_id).map(String::as_str) == Some(holder) {
                holders.remove(slot_id);
            }
            Ok(())
        }
    }

    /// Lists slots normally but every claim hits a storage failure
    struct UnreachableClaims {
        inner: InMemorySlotRepository,
    }

    #[async_trait::async_trait]
    impl SlotRepository for UnreachableClaims {
        async fn list_slots(
            &self,
            facility_id: &FacilityId,
            date: NaiveDate,
        ) -> Result<Vec<TimeSlot>, RepositoryError> {
            self.inner.list_slots(facility_id, date).await
        }

        async fn claim_slot(
            &self,
            _facility_id: &FacilityId,
            _date: NaiveDate,
            _slot_id: &SlotId,
        ) -> Result<TimeSlot, RepositoryError> {
            Err(RepositoryError::Backend("connection reset".to_string()))
        }
    }

    fn orchestrator() -> BookingOrchestrator {
        let facilities = Arc::new(InMemoryFacilityRepository::new(seed::demo_facilities()));
        let slots = Arc::new(InMemorySlotRepository::with_slots(seed::demo_slots(seed::demo_date())));
        BookingOrchestrator::new(facilities, slots, CancellationPolicyEvaluator::default())
    }

    fn command(slot_id: &str, time: &str) -> ConfirmBookingCommand {
        ConfirmBookingCommand {
            facility_id: FacilityId::new("palermo-5"),
            slot_id: SlotId::new(slot_id),
            request: BookingRequest {
                date: seed::demo_date().format(DATE_FORMAT).to_string(),
                time: time.to_string(),
                players: 10,
                contact_name: "Lionel".to_string(),
                contact_phone: "+54 11 5555-1234".to_string(),
                contact_email: "lio@example.com".to_string(),
                terms_accepted: true,
            },
        }
    }

    #[tokio::test]
    async fn test_search_filters_repository_facilities() {
        let orchestrator = orchestrator();
        let criteria = FilterCriteria::default().with_price_range(PriceRange::Low);
        let result = orchestrator.search(&criteria).await.unwrap();
        assert!(!result.is_empty());
        assert!(result.iter().all(|f| f.price < 9000));
    }

    #[tokio::test]
    async fn test_booking_claims_slot() {
        let orchestrator = orchestrator();
        let booking = orchestrator.confirm_booking(command("palermo-5-20240110-1900", "19:00")).await.unwrap();
        assert_eq!(booking.slot_id, SlotId::new("palermo-5-20240110-1900"));

        let slots = orchestrator
            .list_slots(&FacilityId::new("palermo-5"), seed::demo_date())
            .await
            .unwrap();
        let slot = slots.iter().find(|s| s.id == booking.slot_id).unwrap();
        assert!(!slot.available);

        let again = orchestrator.confirm_booking(command("palermo-5-20240110-1900", "19:00")).await;
        assert!(matches!(again, Err(OrchestratorError::SlotUnavailable(_))));
    }

    #[tokio::test]
    async fn test_invalid_request_touches_nothing() {
        let orchestrator = orchestrator();
        let mut cmd = command("palermo-5-20240110-1900", "19:00");
        cmd.request.contact_name.clear();
        cmd.request.terms_accepted = false;

        match orchestrator.confirm_booking(cmd).await {
            Err(OrchestratorError::Invalid(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation failure, got {:?}", other),
        }

        let slots = orchestrator
            .list_slots(&FacilityId::new("palermo-5"), seed::demo_date())
            .await
            .unwrap();
        assert!(slots.iter().find(|s| s.id.as_str() == "palermo-5-20240110-1900").unwrap().available);
    }

    #[tokio::test]
    async fn test_time_must_match_slot() {
        let orchestrator = orchestrator();
        let result = orchestrator.confirm_booking(command("palermo-5-20240110-1900", "20:00")).await;
        assert!(matches!(result, Err(OrchestratorError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_concurrent_claims_yield_one_booking() {
        let orchestrator = Arc::new(orchestrator());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let orchestrator = Arc::clone(&orchestrator);
            handles.push(tokio::spawn(async move {
                orchestrator.confirm_booking(command("palermo-5-20240110-2000", "20:00")).await
            }));
        }

        let mut confirmed = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => confirmed += 1,
                Err(OrchestratorError::SlotUnavailable(_)) => conflicts += 1,
                Err(other) => panic!("unexpected error: {:?}", other),
            }
        }
        assert_eq!(confirmed, 1);
        assert_eq!(conflicts, 7);
    }

    #[tokio::test]
    async fn test_cancel_through_orchestrator() {
        let orchestrator = orchestrator();
        let booking = orchestrator.confirm_booking(command("palermo-5-20240110-1900", "19:00")).await.unwrap();

        let day_before = booking.reservation_start() - chrono::Duration::days(2);
        let cancelled = orchestrator.cancel_booking(&booking.id, day_before).await.unwrap();
        assert_eq!(cancelled.refund.unwrap().fraction, 1.0);

        let bookings = orchestrator
            .facility_bookings(&FacilityId::new("palermo-5"))
            .await
            .unwrap();
        assert_eq!(bookings.len(), 1);
    }

    #[tokio::test]
    async fn test_booking_claims_the_selected_listing_only() {
        let day_one = seed::demo_date();
        let day_two = day_one + chrono::Duration::days(1);
        let at_seven = chrono::NaiveTime::from_hms_opt(19, 0, 0).unwrap();
        let listings = vec![
            SeedListing {
                facility_id: FacilityId::new("palermo-5"),
                date: day_one,
                slots: vec![TimeSlot::new("s1", at_seven, true)],
            },
            SeedListing {
                facility_id: FacilityId::new("cordoba-7"),
                date: day_two,
                slots: vec![TimeSlot::new("s1", at_seven, true)],
            },
        ];
        let orchestrator = BookingOrchestrator::new(
            Arc::new(InMemoryFacilityRepository::new(seed::demo_facilities())),
            Arc::new(InMemorySlotRepository::with_slots(listings)),
            CancellationPolicyEvaluator::default(),
        );

        let booking = orchestrator.confirm_booking(command("s1", "19:00")).await.unwrap();
        assert_eq!(booking.facility_id, FacilityId::new("palermo-5"));

        let palermo = orchestrator.list_slots(&FacilityId::new("palermo-5"), day_one).await.unwrap();
        let cordoba = orchestrator.list_slots(&FacilityId::new("cordoba-7"), day_two).await.unwrap();
        assert!(!palermo[0].available);
        assert!(cordoba[0].available);
    }

    #[tokio::test]
    async fn test_failed_claim_releases_slot_lock() {
        let lock = Arc::new(LocalSlotLock::default());
        let slots = Arc::new(UnreachableClaims {
            inner: InMemorySlotRepository::with_slots(seed::demo_slots(seed::demo_date())),
        });
        let orchestrator = BookingOrchestrator::new(
            Arc::new(InMemoryFacilityRepository::new(seed::demo_facilities())),
            slots,
            CancellationPolicyEvaluator::default(),
        )
        .with_slot_lock(lock.clone());

        let result = orchestrator.confirm_booking(command("palermo-5-20240110-1900", "19:00")).await;
        assert!(matches!(result, Err(OrchestratorError::Storage(_))));
        assert!(lock.holders.lock().unwrap().is_empty());

        // A retry is not blocked by a leftover hold
        let retry = orchestrator.confirm_booking(command("palermo-5-20240110-1900", "19:00")).await;
        assert!(matches!(retry, Err(OrchestratorError::Storage(_))));
    }

    #[tokio::test]
    async fn test_held_slot_is_unavailable() {
        let lock = Arc::new(LocalSlotLock::default());
        lock.acquire(&SlotId::new("palermo-5-20240110-1900"), "another-booking").await.unwrap();
        let orchestrator = orchestrator().with_slot_lock(lock.clone());

        let result = orchestrator.confirm_booking(command("palermo-5-20240110-1900", "19:00")).await;
        assert!(matches!(result, Err(OrchestratorError::SlotUnavailable(_))));
        assert_eq!(lock.holders.lock().unwrap().len(), 1);
    }
}
