use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use cancha_order::{Booking, ConfirmBookingCommand};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", post(create_booking))
        .route("/v1/bookings/{id}", get(get_booking))
        .route("/v1/bookings/{id}/cancel", post(cancel_booking))
}

/// POST /v1/bookings
/// Validate the form, claim the slot and confirm
async fn create_booking(
    State(state): State<AppState>,
    Json(command): Json<ConfirmBookingCommand>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let booking = state.orchestrator.confirm_booking(command).await?;
    info!("Booking {} created for slot {}", booking.id, booking.slot_id);
    Ok((StatusCode::CREATED, Json(booking)))
}

/// GET /v1/bookings/{id}
async fn get_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<Booking>, AppError> {
    state
        .orchestrator
        .get_booking(&booking_id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFoundError(format!("Booking not found: {}", booking_id)))
}

/// POST /v1/bookings/{id}/cancel
/// Refund is priced against the server clock
async fn cancel_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<Booking>, AppError> {
    let booking = state
        .orchestrator
        .cancel_booking(&booking_id, Utc::now())
        .await?;
    Ok(Json(booking))
}
