use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use cancha_catalog::{FilterCriteria, PriceRange};
use cancha_core::{Facility, FacilityId, TimeSlot};
use cancha_order::Booking;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

/// Search form as query parameters. `amenities` is comma separated.
#[derive(Debug, Default, Deserialize)]
pub struct FacilityQuery {
    pub location: Option<String>,
    pub field_type: Option<String>,
    pub price_range: Option<String>,
    pub amenities: Option<String>,
}

impl FacilityQuery {
    pub fn into_criteria(self) -> FilterCriteria {
        FilterCriteria {
            location: self.location.unwrap_or_default(),
            field_type: self.field_type.unwrap_or_default(),
            price_range: self.price_range.as_deref().and_then(PriceRange::from_param),
            amenities: self
                .amenities
                .unwrap_or_default()
                .split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SlotQuery {
    pub date: NaiveDate,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/facilities", get(search_facilities))
        .route("/v1/facilities/{id}", get(get_facility))
        .route("/v1/facilities/{id}/slots", get(list_slots))
        .route("/v1/facilities/{id}/bookings", get(list_facility_bookings))
}

/// GET /v1/facilities
async fn search_facilities(
    State(state): State<AppState>,
    Query(query): Query<FacilityQuery>,
) -> Result<Json<Vec<Facility>>, AppError> {
    let criteria = query.into_criteria();
    let facilities = state.orchestrator.search(&criteria).await?;
    Ok(Json(facilities))
}

/// GET /v1/facilities/{id}
async fn get_facility(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Facility>, AppError> {
    let facility = state.orchestrator.get_facility(&FacilityId::new(id)).await?;
    Ok(Json(facility))
}

/// GET /v1/facilities/{id}/slots?date=YYYY-MM-DD
async fn list_slots(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<SlotQuery>,
) -> Result<Json<Vec<TimeSlot>>, AppError> {
    let slots = state
        .orchestrator
        .list_slots(&FacilityId::new(id), query.date)
        .await?;
    Ok(Json(slots))
}

/// GET /v1/facilities/{id}/bookings
/// Owner dashboard listing
async fn list_facility_bookings(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let bookings = state
        .orchestrator
        .facility_bookings(&FacilityId::new(id))
        .await?;
    Ok(Json(bookings))
}
