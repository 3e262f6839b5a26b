//! Handler for the availability check endpoint.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use lumea_core::availability::AvailabilityResult;
use lumea_core::timegrid::parse_hhmm;
use lumea_core::types::DbId;
use serde::Deserialize;

use crate::booking;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Query parameters for `GET /salons/{salon_id}/availability`.
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub professional_id: DbId,
    pub date: NaiveDate,
    /// Wall-clock `HH:MM`.
    pub start_time: String,
    pub duration_minutes: u32,
}

/// GET /api/v1/salons/{salon_id}/availability
///
/// Read-only admit/deny verdict with diagnostics and suggested alternatives.
/// "Not available" is a 200 with `available: false`, never an error status:
/// both staff-facing and public booking UIs call this before offering a
/// slot and need structured reasons, not exceptions.
pub async fn check_availability(
    State(state): State<AppState>,
    Path(salon_id): Path<DbId>,
    Query(params): Query<AvailabilityQuery>,
) -> AppResult<Json<AvailabilityResult>> {
    let start_time = parse_hhmm(&params.start_time).ok_or_else(|| {
        AppError::BadRequest(format!(
            "invalid start_time '{}', expected HH:MM",
            params.start_time
        ))
    })?;

    let result = booking::availability::check_availability(
        &state.pool,
        salon_id,
        params.professional_id,
        params.date,
        start_time,
        params.duration_minutes,
    )
    .await?;

    Ok(Json(result))
}
