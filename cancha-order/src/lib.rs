pub mod cancellation;
pub mod manager;
pub mod models;
pub mod orchestrator;
pub mod validation;

pub use cancellation::{CancellationError, CancellationPolicy, CancellationPolicyEvaluator, RefundTier};
pub use manager::{BookingError, BookingManager};
pub use models::{Booking, BookingStatus, Refund};
pub use orchestrator::{BookingOrchestrator, ConfirmBookingCommand, OrchestratorError};
pub use validation::{BookingField, BookingRequestValidator, ValidationError, ValidationErrorKind};
