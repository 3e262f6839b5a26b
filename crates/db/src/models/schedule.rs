//! Weekly schedule templates for salons and professionals.

use chrono::NaiveTime;
use lumea_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from `salon_schedules`: one weekday of the salon's operating hours.
/// `open_time`/`close_time` are present exactly when `is_open` is true.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SalonScheduleDay {
    pub id: DbId,
    pub salon_id: DbId,
    pub weekday: i16,
    pub is_open: bool,
    pub open_time: Option<NaiveTime>,
    pub close_time: Option<NaiveTime>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from `professional_schedules`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProfessionalScheduleDay {
    pub id: DbId,
    pub professional_id: DbId,
    pub weekday: i16,
    pub is_working: bool,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for overwriting one weekday of a weekly template. Used for both the
/// salon and professional variants.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateScheduleDay {
    pub weekday: i16,
    pub is_open: bool,
    #[serde(default, deserialize_with = "lumea_core::timegrid::hhmm_serde::deserialize_opt")]
    pub open_time: Option<NaiveTime>,
    #[serde(default, deserialize_with = "lumea_core::timegrid::hhmm_serde::deserialize_opt")]
    pub close_time: Option<NaiveTime>,
}

impl UpdateScheduleDay {
    /// Enforce the template invariant: closed days carry no times, open days
    /// carry a forward window.
    pub fn validate_window(&self) -> Result<(), String> {
        if !(0..=6).contains(&self.weekday) {
            return Err(format!("weekday {} out of range 0-6", self.weekday));
        }
        match (self.is_open, self.open_time, self.close_time) {
            (false, None, None) => Ok(()),
            (false, _, _) => Err("closed days must not carry times".to_string()),
            (true, Some(open), Some(close)) if open < close => Ok(()),
            (true, Some(_), Some(_)) => Err("open_time must precede close_time".to_string()),
            (true, _, _) => Err("open days require open_time and close_time".to_string()),
        }
    }
}
