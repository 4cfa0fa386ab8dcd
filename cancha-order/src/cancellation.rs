use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Refund outcome of an accepted cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefundTier {
    Full,
    Partial,
    None,
}

impl RefundTier {
    pub fn fraction(&self) -> f64 {
        match self {
            RefundTier::Full => 1.0,
            RefundTier::Partial => 0.5,
            RefundTier::None => 0.0,
        }
    }

    /// Amount returned on `price`, rounded down to whole units
    pub fn refund_amount(&self, price: i64) -> i64 {
        match self {
            RefundTier::Full => price,
            RefundTier::Partial => price / 2,
            RefundTier::None => 0,
        }
    }
}

/// Notice windows measured back from the reservation start.
///
/// More notice than `full_refund_notice` earns a full refund; more than
/// `partial_refund_notice` (but not more than the full window) earns half;
/// anything else before the start earns nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancellationPolicy {
    full_refund_notice: Duration,
    partial_refund_notice: Duration,
}

impl Default for CancellationPolicy {
    fn default() -> Self {
        Self {
            full_refund_notice: Duration::hours(24),
            partial_refund_notice: Duration::zero(),
        }
    }
}

impl CancellationPolicy {
    pub fn new(full_refund_notice_hours: i64, partial_refund_notice_hours: i64) -> Result<Self, CancellationError> {
        if partial_refund_notice_hours < 0 || partial_refund_notice_hours > full_refund_notice_hours {
            return Err(CancellationError::InvalidPolicy {
                full_hours: full_refund_notice_hours,
                partial_hours: partial_refund_notice_hours,
            });
        }

        Ok(Self {
            full_refund_notice: Duration::hours(full_refund_notice_hours),
            partial_refund_notice: Duration::hours(partial_refund_notice_hours),
        })
    }

    pub fn full_refund_notice(&self) -> Duration {
        self.full_refund_notice
    }

    pub fn partial_refund_notice(&self) -> Duration {
        self.partial_refund_notice
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CancellationError {
    #[error("Cancellation refused: reservation started at {reservation_start}")]
    Refused { reservation_start: DateTime<Utc> },

    #[error("Invalid cancellation policy: partial window {partial_hours}h must be within 0..={full_hours}h")]
    InvalidPolicy { full_hours: i64, partial_hours: i64 },
}

/// Decides how much of a booking is returned when it is cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancellationPolicyEvaluator {
    policy: CancellationPolicy,
}

impl CancellationPolicyEvaluator {
    pub fn new(policy: CancellationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &CancellationPolicy {
        &self.policy
    }

    /// Reservations that have started (or ended) cannot be cancelled at all;
    /// that is a refusal, not a zero refund.
    pub fn evaluate(
        &self,
        reservation_start: DateTime<Utc>,
        cancellation_time: DateTime<Utc>,
    ) -> Result<RefundTier, CancellationError> {
        if cancellation_time >= reservation_start {
            return Err(CancellationError::Refused { reservation_start });
        }

        let notice = reservation_start - cancellation_time;
        if notice > self.policy.full_refund_notice {
            Ok(RefundTier::Full)
        } else if notice > self.policy.partial_refund_notice {
            Ok(RefundTier::Partial)
        } else {
            Ok(RefundTier::None)
        }
    }

    pub fn refund_fraction(
        &self,
        reservation_start: DateTime<Utc>,
        cancellation_time: DateTime<Utc>,
    ) -> Result<f64, CancellationError> {
        self.evaluate(reservation_start, cancellation_time)
            .map(|tier| tier.fraction())
    }
}
