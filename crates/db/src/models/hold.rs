//! Booking holds: short-lived exclusive claims taken during checkout.

use chrono::{NaiveDate, NaiveTime};
use lumea_core::hold::HoldStatus;
use lumea_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from `booking_holds`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Hold {
    pub id: DbId,
    pub salon_id: DbId,
    pub professional_id: DbId,
    pub service_id: DbId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: String,
    pub expires_at: Timestamp,
    pub session_id: String,
    pub client_name: String,
    pub client_phone: String,
    pub client_id: Option<DbId>,
    pub appointment_id: Option<DbId>,
    pub converted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Hold {
    /// Typed view of the text status column.
    pub fn status(&self) -> Option<HoldStatus> {
        HoldStatus::parse(&self.status)
    }
}

/// DTO for `POST /salons/{salon_id}/holds`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateHold {
    pub professional_id: DbId,
    pub service_id: DbId,
    pub date: NaiveDate,
    /// Wall-clock `HH:MM`.
    #[serde(deserialize_with = "lumea_core::timegrid::hhmm_serde::deserialize")]
    pub start_time: NaiveTime,
    #[validate(length(min = 1, max = 120))]
    pub client_name: String,
    #[validate(length(min = 5, max = 32))]
    pub client_phone: String,
    /// Groups holds created by the same checkout session. Generated
    /// server-side when absent.
    pub session_id: Option<String>,
}

/// Fully-resolved insert values for a hold, produced by the hold manager
/// after gating and duration resolution.
#[derive(Debug, Clone)]
pub struct NewHold {
    pub salon_id: DbId,
    pub professional_id: DbId,
    pub service_id: DbId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub expires_at: Timestamp,
    pub session_id: String,
    pub client_name: String,
    pub client_phone: String,
    pub client_id: Option<DbId>,
}

/// Outcome of the atomic conflict-check-then-insert in
/// [`crate::repositories::HoldRepo::create_exclusive`].
#[derive(Debug)]
pub enum HoldCreateOutcome {
    Created(Hold),
    /// Another session already holds an overlapping range.
    HoldConflict,
    /// A non-cancelled appointment occupies an overlapping range.
    AppointmentConflict,
}
