use cancha_core::slot::hhmm;
use cancha_core::{FacilityId, SlotId};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cancellation::RefundTier;

/// Booking status in the lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

/// Money returned when a booking was cancelled
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Refund {
    pub tier: RefundTier,
    pub fraction: f64,
    pub amount: i64,
}

impl Refund {
    pub fn new(tier: RefundTier, price: i64) -> Self {
        Self {
            tier,
            fraction: tier.fraction(),
            amount: tier.refund_amount(price),
        }
    }
}

/// A confirmed reservation of one slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub facility_id: FacilityId,
    pub slot_id: SlotId,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub players: i32,
    pub contact_name: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub price: i64,
    pub status: BookingStatus,
    pub refund: Option<Refund>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Reservation start. Facility-local wall-clock times are treated as UTC.
    pub fn reservation_start(&self) -> DateTime<Utc> {
        self.date.and_time(self.time).and_utc()
    }

    /// Update booking status
    pub fn update_status(&mut self, new_status: BookingStatus) {
        self.status = new_status;
        self.updated_at = Utc::now();
    }
}
