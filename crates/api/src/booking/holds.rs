//! The hold manager: create, read, extend, release, convert, and sweep
//! time-bounded exclusive claims on booking slots.
//!
//! Creation re-validates against active holds and occupying appointments
//! inside a per-(professional, date) critical section (see
//! [`HoldRepo::create_exclusive`]), closing the race window left open by a
//! prior read-only availability check.

use chrono::{Duration, Utc};
use lumea_core::error::CoreError;
use lumea_core::hold::{self, HoldStatus, DEFAULT_EXTENSION_MINUTES};
use lumea_core::timegrid::add_minutes;
use lumea_core::types::{DbId, Timestamp};
use lumea_db::models::hold::{CreateHold, Hold, HoldCreateOutcome, NewHold};
use lumea_db::repositories::{AppointmentRepo, DirectoryRepo, HoldRepo, SettingsRepo};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Slot and expiry summary returned to checkout UIs. `expires_in_seconds`
/// drives client-side countdowns.
#[derive(Debug, serde::Serialize)]
pub struct HoldSummary {
    pub id: DbId,
    pub professional_id: DbId,
    pub service_id: DbId,
    pub date: chrono::NaiveDate,
    pub start_time: chrono::NaiveTime,
    pub end_time: chrono::NaiveTime,
    pub status: String,
    pub session_id: String,
    pub expires_at: Timestamp,
    pub expires_in_seconds: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_id: Option<DbId>,
}

impl HoldSummary {
    pub fn from_hold(hold: Hold, now: Timestamp) -> Self {
        let expires_in_seconds = (hold.expires_at - now).num_seconds().max(0);
        Self {
            id: hold.id,
            professional_id: hold.professional_id,
            service_id: hold.service_id,
            date: hold.date,
            start_time: hold.start_time,
            end_time: hold.end_time,
            status: hold.status,
            session_id: hold.session_id,
            expires_at: hold.expires_at,
            expires_in_seconds,
            appointment_id: hold.appointment_id,
        }
    }
}

/// Create an ACTIVE hold for a checkout session.
///
/// Gating order: online booking enabled, service valid for online booking,
/// professional valid; then the atomic conflict-check-then-insert.
pub async fn create_hold(
    pool: &PgPool,
    salon_id: DbId,
    input: CreateHold,
) -> AppResult<HoldSummary> {
    input.validate()?;
    super::ensure_salon(pool, salon_id).await?;

    let settings = SettingsRepo::get_or_create(pool, salon_id).await?;
    if !settings.online_booking_enabled {
        return Err(AppError::Core(CoreError::Validation(
            "Online booking is disabled for this salon".to_string(),
        )));
    }

    let service = DirectoryRepo::find_service(pool, salon_id, input.service_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Service",
            id: input.service_id,
        })?;
    if !service.is_active || !service.allow_online_booking {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Service '{}' is not available for online booking",
            service.name
        ))));
    }

    let professional = DirectoryRepo::find_professional(pool, salon_id, input.professional_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Professional",
            id: input.professional_id,
        })?;
    if !professional.is_active {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Professional '{}' is not currently accepting bookings",
            professional.name
        ))));
    }

    let duration = u32::try_from(service.duration_minutes)
        .map_err(|_| CoreError::Internal("service duration out of range".to_string()))?;
    let end_time = add_minutes(input.start_time, duration).ok_or_else(|| {
        CoreError::Validation(
            "The requested service would cross midnight; bookings must end within the same day"
                .to_string(),
        )
    })?;

    // Convenience linking only; a missing client is fine.
    let client = DirectoryRepo::find_client_by_phone(pool, salon_id, &input.client_phone).await?;

    let now = Utc::now();
    let expires_at = now + Duration::minutes(i64::from(settings.hold_duration_minutes));
    let session_id = input
        .session_id
        .clone()
        .unwrap_or_else(|| Uuid::now_v7().to_string());

    let new_hold = NewHold {
        salon_id,
        professional_id: input.professional_id,
        service_id: input.service_id,
        date: input.date,
        start_time: input.start_time,
        end_time,
        expires_at,
        session_id,
        client_name: input.client_name.clone(),
        client_phone: input.client_phone.clone(),
        client_id: client.map(|c| c.id),
    };

    match HoldRepo::create_exclusive(pool, &new_hold).await? {
        HoldCreateOutcome::Created(hold) => {
            tracing::info!(
                hold_id = hold.id,
                salon_id,
                professional_id = hold.professional_id,
                date = %hold.date,
                "Hold created"
            );
            Ok(HoldSummary::from_hold(hold, now))
        }
        HoldCreateOutcome::HoldConflict => Err(AppError::Core(CoreError::Conflict(
            "Another client is currently completing checkout for this time slot".to_string(),
        ))),
        HoldCreateOutcome::AppointmentConflict => Err(AppError::Core(CoreError::Conflict(
            "This time slot is already booked".to_string(),
        ))),
    }
}

/// Fetch a hold by id in whatever state it is in.
///
/// Applies the derived liveness rule on read: an ACTIVE row whose TTL has
/// passed is transitioned to EXPIRED here (idempotently), so the terminal-
/// state invariant holds without waiting for the background sweep and the
/// caller never sees a stale ACTIVE status.
pub async fn get_hold(pool: &PgPool, salon_id: DbId, hold_id: DbId) -> AppResult<Hold> {
    let mut hold = HoldRepo::find_by_id(pool, salon_id, hold_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Hold",
            id: hold_id,
        })?;

    let status = hold
        .status()
        .ok_or_else(|| CoreError::Internal(format!("unknown hold status '{}'", hold.status)))?;

    let live = hold::is_effectively_active(status, hold.expires_at, Utc::now());
    if status == HoldStatus::Active && !live {
        HoldRepo::mark_expired(pool, hold.id).await?;
        hold.status = HoldStatus::Expired.as_str().to_string();
        tracing::debug!(hold_id = hold.id, "Hold lazily expired on read");
    }

    Ok(hold)
}

/// Fetch a hold that must still be usable by its checkout session. Used by
/// the mutating operations; terminal states map to the errors their HTTP
/// callers expect (410 for EXPIRED, 409 otherwise).
pub async fn get_active_hold(pool: &PgPool, salon_id: DbId, hold_id: DbId) -> AppResult<Hold> {
    let hold = get_hold(pool, salon_id, hold_id).await?;

    match hold.status() {
        Some(HoldStatus::Active) => Ok(hold),
        // Repeated reads of a lazily-expired hold keep reporting expiry.
        Some(HoldStatus::Expired) => Err(AppError::Core(CoreError::Expired(
            "This hold has expired; please pick a time slot again".to_string(),
        ))),
        _ => Err(AppError::Core(CoreError::InvalidState(format!(
            "Hold is {}, not ACTIVE",
            hold.status
        )))),
    }
}

/// Extend an active hold, capped at 1.5x the salon's base hold duration
/// across the hold's whole lifetime.
pub async fn extend_hold(
    pool: &PgPool,
    salon_id: DbId,
    hold_id: DbId,
    extra_minutes: Option<i32>,
) -> AppResult<HoldSummary> {
    let extra = extra_minutes.unwrap_or(DEFAULT_EXTENSION_MINUTES);
    let hold = get_active_hold(pool, salon_id, hold_id).await?;
    let settings = SettingsRepo::get_or_create(pool, salon_id).await?;

    hold::validate_extension(
        hold.created_at,
        hold.expires_at,
        extra,
        settings.hold_duration_minutes,
    )
    .map_err(CoreError::Validation)?;

    let cap = hold::max_lifetime_minutes(settings.hold_duration_minutes);
    let Some(updated) = HoldRepo::extend(pool, hold_id, extra, cap).await? else {
        // The row changed between the read and the update: another request
        // expired it, transitioned it, or consumed the remaining cap
        // headroom. Re-reading distinguishes the expiry cases.
        get_active_hold(pool, salon_id, hold_id).await?;
        return Err(AppError::Core(CoreError::Validation(format!(
            "Extension denied: the hold is already at its {cap} minute lifetime cap"
        ))));
    };

    tracing::info!(hold_id, extra_minutes = extra, "Hold extended");
    Ok(HoldSummary::from_hold(updated, Utc::now()))
}

/// Release a hold at the client's request. Valid only from ACTIVE; an
/// expired-but-unswept row may still be released since its claim is gone
/// either way.
pub async fn release_hold(pool: &PgPool, salon_id: DbId, hold_id: DbId) -> AppResult<()> {
    let hold = HoldRepo::find_by_id(pool, salon_id, hold_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Hold",
            id: hold_id,
        })?;

    let status = hold
        .status()
        .ok_or_else(|| CoreError::Internal(format!("unknown hold status '{}'", hold.status)))?;
    status
        .validate_transition(HoldStatus::Released)
        .map_err(CoreError::InvalidState)?;

    if !HoldRepo::mark_released(pool, hold_id).await? {
        return Err(AppError::Core(CoreError::InvalidState(
            "Hold is no longer active".to_string(),
        )));
    }

    tracing::info!(hold_id, salon_id, "Hold released");
    Ok(())
}

/// Convert a hold into its confirmed appointment at checkout completion.
///
/// Not re-entrant-safe for two calls carrying different appointment ids:
/// the second call fails InvalidState because the hold has left ACTIVE.
pub async fn convert_to_appointment(
    pool: &PgPool,
    salon_id: DbId,
    hold_id: DbId,
    appointment_id: DbId,
) -> AppResult<HoldSummary> {
    get_active_hold(pool, salon_id, hold_id).await?;

    AppointmentRepo::find_by_id(pool, appointment_id)
        .await?
        .filter(|a| a.salon_id == salon_id)
        .ok_or(CoreError::NotFound {
            entity: "Appointment",
            id: appointment_id,
        })?;

    let converted = HoldRepo::mark_converted(pool, hold_id, appointment_id)
        .await?
        .ok_or_else(|| {
            CoreError::InvalidState("Hold is no longer active".to_string())
        })?;

    tracing::info!(hold_id, appointment_id, "Hold converted to appointment");
    Ok(HoldSummary::from_hold(converted, Utc::now()))
}

/// All holds created by one checkout session, newest first.
pub async fn get_holds_by_session(
    pool: &PgPool,
    salon_id: DbId,
    session_id: &str,
) -> AppResult<Vec<HoldSummary>> {
    let holds = HoldRepo::list_by_session(pool, salon_id, session_id).await?;
    let now = Utc::now();
    Ok(holds
        .into_iter()
        .map(|h| HoldSummary::from_hold(h, now))
        .collect())
}

/// Batch sweep: persist EXPIRED for every ACTIVE hold past its TTL.
/// Idempotent; invoked by the background sweeper.
pub async fn cleanup_expired_holds(pool: &PgPool) -> AppResult<u64> {
    Ok(HoldRepo::expire_overdue(pool).await?)
}
