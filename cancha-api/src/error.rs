use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cancha_order::{BookingError, CancellationError, OrchestratorError, ValidationError};
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    ValidationError(Vec<ValidationError>),
    NotFoundError(String),
    ConflictError(String),
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match self {
            AppError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Booking request invalid".to_string(),
                Some(json!(errors)),
            ),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg, None),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg, None),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string(), None)
            }
        };

        let body = match details {
            Some(details) => Json(json!({ "error": error_message, "details": details })),
            None => Json(json!({ "error": error_message })),
        };

        (status, body).into_response()
    }
}

impl From<OrchestratorError> for AppError {
    fn from(err: OrchestratorError) -> Self {
        match err {
            OrchestratorError::Invalid(errors) => AppError::ValidationError(errors),
            OrchestratorError::FacilityNotFound(_) | OrchestratorError::SlotNotFound(_) => {
                AppError::NotFoundError(err.to_string())
            }
            OrchestratorError::SlotUnavailable(_) => AppError::ConflictError(err.to_string()),
            OrchestratorError::Booking(BookingError::NotFound(_)) => AppError::NotFoundError(err.to_string()),
            OrchestratorError::Booking(BookingError::InvalidTransition { .. })
            | OrchestratorError::Booking(BookingError::Cancellation(CancellationError::Refused { .. })) => {
                AppError::ConflictError(err.to_string())
            }
            OrchestratorError::Booking(BookingError::Cancellation(CancellationError::InvalidPolicy { .. }))
            | OrchestratorError::Catalog(_)
            | OrchestratorError::Storage(_) => AppError::InternalServerError(err.to_string()),
        }
    }
}
