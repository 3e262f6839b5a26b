//! Handlers for the weekly schedule templates and ad-hoc block-offs.
//!
//! These administrative flows are the write side of the calendar store the
//! availability checker reads.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use lumea_core::error::CoreError;
use lumea_core::types::DbId;
use lumea_db::models::block::CreateProfessionalBlock;
use lumea_db::models::schedule::UpdateScheduleDay;
use lumea_db::repositories::{BlockRepo, DirectoryRepo, ScheduleRepo};
use serde::Deserialize;

use crate::booking;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Body for `POST /professionals/{id}/schedule/seed`.
#[derive(Debug, Deserialize)]
pub struct SeedScheduleBody {
    pub salon_id: DbId,
}

fn validate_days(days: &[UpdateScheduleDay]) -> AppResult<()> {
    for day in days {
        day.validate_window()
            .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    }
    Ok(())
}

/// GET /api/v1/salons/{salon_id}/schedule
///
/// The salon's weekly template, seeding the default (closed Sunday,
/// 08:00-19:00 otherwise) on first access.
pub async fn get_salon_schedule(
    State(state): State<AppState>,
    Path(salon_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    booking::ensure_salon(&state.pool, salon_id).await?;
    let week = ScheduleRepo::salon_week(&state.pool, salon_id).await?;
    Ok(Json(serde_json::json!({ "data": week })))
}

/// PUT /api/v1/salons/{salon_id}/schedule
///
/// Overwrite one or more weekdays of the salon template.
pub async fn update_salon_schedule(
    State(state): State<AppState>,
    Path(salon_id): Path<DbId>,
    Json(days): Json<Vec<UpdateScheduleDay>>,
) -> AppResult<Json<serde_json::Value>> {
    booking::ensure_salon(&state.pool, salon_id).await?;
    validate_days(&days)?;
    for day in &days {
        ScheduleRepo::upsert_salon_day(&state.pool, salon_id, day).await?;
    }
    let week = ScheduleRepo::salon_week(&state.pool, salon_id).await?;
    Ok(Json(serde_json::json!({ "data": week })))
}

/// GET /api/v1/professionals/{id}/schedule
pub async fn get_professional_schedule(
    State(state): State<AppState>,
    Path(professional_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let week = ScheduleRepo::professional_week(&state.pool, professional_id).await?;
    Ok(Json(serde_json::json!({ "data": week })))
}

/// PUT /api/v1/professionals/{id}/schedule
pub async fn update_professional_schedule(
    State(state): State<AppState>,
    Path(professional_id): Path<DbId>,
    Json(days): Json<Vec<UpdateScheduleDay>>,
) -> AppResult<Json<serde_json::Value>> {
    validate_days(&days)?;
    for day in &days {
        ScheduleRepo::upsert_professional_day(&state.pool, professional_id, day).await?;
    }
    let week = ScheduleRepo::professional_week(&state.pool, professional_id).await?;
    Ok(Json(serde_json::json!({ "data": week })))
}

/// POST /api/v1/professionals/{id}/schedule/seed
///
/// Onboarding: copy the salon's weekly template onto the professional.
pub async fn seed_professional_schedule(
    State(state): State<AppState>,
    Path(professional_id): Path<DbId>,
    Json(body): Json<SeedScheduleBody>,
) -> AppResult<Json<serde_json::Value>> {
    DirectoryRepo::find_professional(&state.pool, body.salon_id, professional_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Professional",
            id: professional_id,
        })?;

    ScheduleRepo::seed_professional_from_salon(&state.pool, professional_id, body.salon_id)
        .await?;
    let week = ScheduleRepo::professional_week(&state.pool, professional_id).await?;
    Ok(Json(serde_json::json!({ "data": week })))
}

/// POST /api/v1/professionals/{id}/blocks
pub async fn create_block(
    State(state): State<AppState>,
    Path(professional_id): Path<DbId>,
    Json(input): Json<CreateProfessionalBlock>,
) -> AppResult<impl IntoResponse> {
    if input.start_date > input.end_date {
        return Err(AppError::Core(CoreError::Validation(
            "start_date must not follow end_date".to_string(),
        )));
    }
    if let (Some(start), Some(end)) = (input.start_time, input.end_time) {
        if start >= end {
            return Err(AppError::Core(CoreError::Validation(
                "start_time must precede end_time".to_string(),
            )));
        }
    }

    let block = BlockRepo::create(&state.pool, professional_id, &input).await?;
    Ok((StatusCode::CREATED, Json(block)))
}

/// GET /api/v1/professionals/{id}/blocks
pub async fn list_blocks(
    State(state): State<AppState>,
    Path(professional_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let blocks = BlockRepo::list_for_professional(&state.pool, professional_id).await?;
    Ok(Json(serde_json::json!({ "data": blocks })))
}

/// DELETE /api/v1/professionals/{id}/blocks/{block_id}
pub async fn delete_block(
    State(state): State<AppState>,
    Path((professional_id, block_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let deleted = BlockRepo::delete(&state.pool, professional_id, block_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Block",
            id: block_id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
