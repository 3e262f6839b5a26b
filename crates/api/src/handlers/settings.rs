//! Handlers for per-salon online-booking settings.

use axum::extract::{Path, State};
use axum::Json;
use lumea_core::types::DbId;
use lumea_db::models::settings::{BookingSettings, UpdateBookingSettings};
use lumea_db::repositories::SettingsRepo;
use validator::Validate;

use crate::booking;
use crate::error::AppResult;
use crate::state::AppState;

/// GET /api/v1/salons/{salon_id}/booking-settings
pub async fn get_settings(
    State(state): State<AppState>,
    Path(salon_id): Path<DbId>,
) -> AppResult<Json<BookingSettings>> {
    booking::ensure_salon(&state.pool, salon_id).await?;
    let settings = SettingsRepo::get_or_create(&state.pool, salon_id).await?;
    Ok(Json(settings))
}

/// PUT /api/v1/salons/{salon_id}/booking-settings
///
/// Patch semantics: absent fields keep their current values.
pub async fn update_settings(
    State(state): State<AppState>,
    Path(salon_id): Path<DbId>,
    Json(input): Json<UpdateBookingSettings>,
) -> AppResult<Json<BookingSettings>> {
    booking::ensure_salon(&state.pool, salon_id).await?;
    input.validate()?;
    let settings = SettingsRepo::update(&state.pool, salon_id, &input).await?;
    Ok(Json(settings))
}
