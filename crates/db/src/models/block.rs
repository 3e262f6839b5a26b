//! Ad-hoc professional block-offs.

use chrono::{NaiveDate, NaiveTime};
use lumea_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Block status that the availability checker enforces; rows in any other
/// status are ignored.
pub const BLOCK_STATUS_APPROVED: &str = "APPROVED";

/// A row from `professional_blocks`. Missing times mean the whole day.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProfessionalBlock {
    pub id: DbId,
    pub professional_id: DbId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub status: String,
    pub title: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `POST /professionals/{id}/blocks`. Single-day blocks pass equal
/// dates; omitting both times blocks the whole day.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProfessionalBlock {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, deserialize_with = "lumea_core::timegrid::hhmm_serde::deserialize_opt")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, deserialize_with = "lumea_core::timegrid::hhmm_serde::deserialize_opt")]
    pub end_time: Option<NaiveTime>,
    pub status: Option<String>,
    pub title: Option<String>,
}
