//! Handlers for the checkout-hold protocol:
//! create -> (optionally extend) -> convert-or-release.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use lumea_core::types::DbId;
use lumea_db::models::hold::CreateHold;
use serde::Deserialize;

use crate::booking::holds as hold_manager;
use crate::error::AppResult;
use crate::state::AppState;

/// Query parameters for `GET /salons/{salon_id}/holds`.
#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    pub session_id: String,
}

/// Body for `POST /salons/{salon_id}/holds/{id}/extend`.
#[derive(Debug, Deserialize)]
pub struct ExtendHoldBody {
    /// Defaults to 5 minutes when omitted.
    pub extra_minutes: Option<i32>,
}

/// Body for `POST /salons/{salon_id}/holds/{id}/convert`.
#[derive(Debug, Deserialize)]
pub struct ConvertHoldBody {
    pub appointment_id: DbId,
}

/// POST /api/v1/salons/{salon_id}/holds
///
/// Take an exclusive claim on a slot while the client completes checkout.
/// 201 with the hold summary, or 409 when another session or an existing
/// appointment already occupies an overlapping range.
pub async fn create_hold(
    State(state): State<AppState>,
    Path(salon_id): Path<DbId>,
    Json(input): Json<CreateHold>,
) -> AppResult<impl IntoResponse> {
    let summary = hold_manager::create_hold(&state.pool, salon_id, input).await?;
    Ok((StatusCode::CREATED, Json(summary)))
}

/// GET /api/v1/salons/{salon_id}/holds?session_id=...
///
/// Recover a checkout session's in-flight holds after a page reload.
pub async fn list_session_holds(
    State(state): State<AppState>,
    Path(salon_id): Path<DbId>,
    Query(params): Query<SessionQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let holds =
        hold_manager::get_holds_by_session(&state.pool, salon_id, &params.session_id).await?;
    Ok(Json(serde_json::json!({ "data": holds })))
}

/// GET /api/v1/salons/{salon_id}/holds/{id}
///
/// Fetch a hold in any state, so a checkout UI can read its own receipt
/// after conversion or release. An ACTIVE hold past its TTL is lazily
/// transitioned to EXPIRED before it is returned; the `status` field and a
/// zero `expires_in_seconds` tell the client the claim is gone.
pub async fn get_hold(
    State(state): State<AppState>,
    Path((salon_id, hold_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<hold_manager::HoldSummary>> {
    let hold = hold_manager::get_hold(&state.pool, salon_id, hold_id).await?;
    let summary = hold_manager::HoldSummary::from_hold(hold, chrono::Utc::now());
    Ok(Json(summary))
}

/// POST /api/v1/salons/{salon_id}/holds/{id}/extend
pub async fn extend_hold(
    State(state): State<AppState>,
    Path((salon_id, hold_id)): Path<(DbId, DbId)>,
    Json(body): Json<ExtendHoldBody>,
) -> AppResult<Json<hold_manager::HoldSummary>> {
    let summary =
        hold_manager::extend_hold(&state.pool, salon_id, hold_id, body.extra_minutes).await?;
    Ok(Json(summary))
}

/// POST /api/v1/salons/{salon_id}/holds/{id}/release
///
/// Client/UI-initiated cancellation of the claim. 204 on success.
pub async fn release_hold(
    State(state): State<AppState>,
    Path((salon_id, hold_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    hold_manager::release_hold(&state.pool, salon_id, hold_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/salons/{salon_id}/holds/{id}/convert
///
/// Checkout completed: stamp the linking appointment and finalize the hold.
pub async fn convert_hold(
    State(state): State<AppState>,
    Path((salon_id, hold_id)): Path<(DbId, DbId)>,
    Json(body): Json<ConvertHoldBody>,
) -> AppResult<Json<hold_manager::HoldSummary>> {
    let summary = hold_manager::convert_to_appointment(
        &state.pool,
        salon_id,
        hold_id,
        body.appointment_id,
    )
    .await?;
    Ok(Json(summary))
}
