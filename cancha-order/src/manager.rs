use std::collections::HashMap;

use cancha_core::{BookingRequest, Facility, FacilityId, TimeSlot};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::cancellation::{CancellationError, CancellationPolicyEvaluator};
use crate::models::{Booking, BookingStatus, Refund};

/// Keeps confirmed bookings and drives their lifecycle.
///
/// The slot behind a booking must already be claimed; the manager only
/// records the outcome.
pub struct BookingManager {
    bookings: HashMap<Uuid, Booking>,
    evaluator: CancellationPolicyEvaluator,
}

impl BookingManager {
    pub fn new(evaluator: CancellationPolicyEvaluator) -> Self {
        Self {
            bookings: HashMap::new(),
            evaluator,
        }
    }

    /// Record a booking for a claimed slot
    pub fn confirm(
        &mut self,
        facility: &Facility,
        slot: &TimeSlot,
        date: NaiveDate,
        request: &BookingRequest,
    ) -> Booking {
        let now = Utc::now();
        let booking = Booking {
            id: Uuid::new_v4(),
            facility_id: facility.id.clone(),
            slot_id: slot.id.clone(),
            date,
            time: slot.time,
            players: request.players,
            contact_name: request.contact_name.clone(),
            contact_phone: request.contact_phone.clone(),
            contact_email: request.contact_email.clone(),
            price: facility.price,
            status: BookingStatus::Confirmed,
            refund: None,
            created_at: now,
            updated_at: now,
        };

        info!(
            "Booking confirmed: {} ({} {} {})",
            booking.id,
            facility.id,
            date,
            slot.time_label()
        );
        self.bookings.insert(booking.id, booking.clone());
        booking
    }

    pub fn get_booking(&self, booking_id: &Uuid) -> Option<&Booking> {
        self.bookings.get(booking_id)
    }

    /// Bookings for one facility, earliest reservation first
    pub fn list_for_facility(&self, facility_id: &FacilityId) -> Vec<Booking> {
        let mut bookings: Vec<Booking> = self
            .bookings
            .values()
            .filter(|booking| &booking.facility_id == facility_id)
            .cloned()
            .collect();
        bookings.sort_by_key(|booking| booking.reservation_start());
        bookings
    }

    /// Transition: Confirmed → Cancelled, pricing the refund at `cancelled_at`
    pub fn cancel_booking(
        &mut self,
        booking_id: &Uuid,
        cancelled_at: DateTime<Utc>,
    ) -> Result<Booking, BookingError> {
        let evaluator = self.evaluator.clone();
        let booking = self.get_booking_mut(booking_id)?;

        if booking.status != BookingStatus::Confirmed {
            return Err(BookingError::InvalidTransition {
                from: format!("{:?}", booking.status),
                to: "CANCELLED".to_string(),
            });
        }

        let tier = evaluator
            .evaluate(booking.reservation_start(), cancelled_at)
            .inspect_err(|e| warn!("Cancellation of {} refused: {}", booking_id, e))?;

        booking.refund = Some(Refund::new(tier, booking.price));
        booking.update_status(BookingStatus::Cancelled);
        info!("Booking cancelled: {} refund {:?}", booking_id, tier);

        Ok(booking.clone())
    }

    fn get_booking_mut(&mut self, booking_id: &Uuid) -> Result<&mut Booking, BookingError> {
        self.bookings
            .get_mut(booking_id)
            .ok_or_else(|| BookingError::NotFound(booking_id.to_string()))
    }
}

impl Default for BookingManager {
    fn default() -> Self {
        Self::new(CancellationPolicyEvaluator::default())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Booking not found: {0}")]
    NotFound(String),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error(transparent)]
    Cancellation(#[from] CancellationError),
}
