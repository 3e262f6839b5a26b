//! Confirmed bookings, read by the availability checker and hold manager.

use chrono::{NaiveDate, NaiveTime};
use lumea_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Appointment statuses that occupy a slot for conflict purposes.
/// CANCELLED, NO_SHOW, and COMPLETED never block.
pub const OCCUPYING_STATUSES: [&str; 3] = ["SCHEDULED", "CONFIRMED", "PENDING_CONFIRMATION"];

/// `OCCUPYING_STATUSES` as a quoted, comma-separated SQL `IN` list. The
/// values are compile-time constants, never request input.
pub fn occupying_status_list() -> String {
    OCCUPYING_STATUSES
        .iter()
        .map(|s| format!("'{s}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// A row from `appointments`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Appointment {
    pub id: DbId,
    pub salon_id: DbId,
    pub professional_id: DbId,
    pub client_name: String,
    pub client_phone: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting an appointment. Creation is driven by the checkout
/// flow (hold conversion) and by staff-facing booking, both outside this
/// engine's public surface; the repo method exists for those callers and
/// for test fixtures.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAppointment {
    pub salon_id: DbId,
    pub professional_id: DbId,
    pub client_name: String,
    pub client_phone: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: Option<String>,
}
