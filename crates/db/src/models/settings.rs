//! Per-salon online-booking settings.

use lumea_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from `booking_settings`. Lazily seeded with defaults on first read.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BookingSettings {
    pub id: DbId,
    pub salon_id: DbId,
    pub online_booking_enabled: bool,
    pub hold_duration_minutes: i32,
    pub slot_granularity_minutes: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `PUT /salons/{salon_id}/booking-settings`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateBookingSettings {
    pub online_booking_enabled: Option<bool>,
    #[validate(range(min = 1, max = 120))]
    pub hold_duration_minutes: Option<i32>,
    #[validate(range(min = 5, max = 120))]
    pub slot_granularity_minutes: Option<i32>,
}
