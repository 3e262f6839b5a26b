//! Wall-clock time math shared by the availability checker and hold manager.
//!
//! All times are salon-local `chrono::NaiveTime` values on a single calendar
//! day. Spans crossing midnight are not supported: minute arithmetic that
//! would wrap returns `None` and callers reject the request up front.

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::Serialize;

/// Maximum suggestions returned for a near-miss scan anchored around the
/// originally requested time.
pub const ANCHORED_SUGGESTION_CAP: usize = 4;

/// Maximum suggestions returned for a full-day chronological scan.
pub const FULL_SCAN_SUGGESTION_CAP: usize = 6;

/// Default scan step when a salon has not configured its own granularity.
pub const DEFAULT_SLOT_GRANULARITY_MINUTES: u32 = 30;

/// A half-open `[start, end)` time range within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeRange {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Half-open overlap test: touching boundaries do not conflict.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Add minutes to a wall-clock time. Returns `None` if the result would
/// reach or cross midnight. Widened arithmetic: `minutes` arrives from
/// request input and may be arbitrarily large.
pub fn add_minutes(time: NaiveTime, minutes: u32) -> Option<NaiveTime> {
    let total = u64::from(time.hour()) * 60 + u64::from(time.minute()) + u64::from(minutes);
    if total >= 24 * 60 {
        return None;
    }
    NaiveTime::from_hms_opt((total / 60) as u32, (total % 60) as u32, 0)
}

/// Weekday index matching the schedule tables: 0 = Sunday .. 6 = Saturday.
pub fn weekday_index(date: NaiveDate) -> i16 {
    use chrono::Datelike;
    date.weekday().num_days_from_sunday() as i16
}

/// Human-readable weekday name for a 0-6 index.
pub fn weekday_name(index: i16) -> &'static str {
    match index {
        0 => "Sunday",
        1 => "Monday",
        2 => "Tuesday",
        3 => "Wednesday",
        4 => "Thursday",
        5 => "Friday",
        6 => "Saturday",
        _ => "Unknown",
    }
}

/// Format a time as `HH:MM` for user-facing messages and suggestion lists.
pub fn hhmm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Parse a wall-clock time from `HH:MM`, accepting `HH:MM:SS` as well.
pub fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

/// Serde deserializers for `HH:MM` time fields on inbound DTOs. Outbound
/// serialization keeps chrono's default `HH:MM:SS` format.
pub mod hhmm_serde {
    use chrono::NaiveTime;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    use super::parse_hhmm;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        parse_hhmm(&value)
            .ok_or_else(|| Error::custom(format!("invalid time '{value}', expected HH:MM")))
    }

    pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: Option<String> = Option::deserialize(deserializer)?;
        value
            .map(|v| {
                parse_hhmm(&v)
                    .ok_or_else(|| Error::custom(format!("invalid time '{v}', expected HH:MM")))
            })
            .transpose()
    }
}

/// Minutes since midnight, used to order anchored suggestions by proximity.
fn minute_of_day(time: NaiveTime) -> i64 {
    (time.hour() * 60 + time.minute()) as i64
}

/// Scan `window` in `step_minutes` increments and collect candidate starts
/// where a `duration_minutes` service fits inside the window without
/// overlapping any `occupied` range.
///
/// Candidates are produced chronologically; callers re-order and cap.
fn scan_candidates(
    window: TimeRange,
    duration_minutes: u32,
    step_minutes: u32,
    occupied: &[TimeRange],
) -> Vec<NaiveTime> {
    let step = step_minutes.max(1);
    let mut candidates = Vec::new();
    let mut cursor = window.start;

    loop {
        let Some(end) = add_minutes(cursor, duration_minutes) else {
            break;
        };
        if end > window.end {
            break;
        }
        let slot = TimeRange::new(cursor, end);
        if !occupied.iter().any(|o| slot.overlaps(o)) {
            candidates.push(cursor);
        }
        match add_minutes(cursor, step) {
            Some(next) => cursor = next,
            None => break,
        }
    }

    candidates
}

/// Up to [`FULL_SCAN_SUGGESTION_CAP`] free slots across the whole window,
/// in chronological order.
pub fn suggest_slots(
    window: TimeRange,
    duration_minutes: u32,
    step_minutes: u32,
    occupied: &[TimeRange],
) -> Vec<NaiveTime> {
    let mut candidates = scan_candidates(window, duration_minutes, step_minutes, occupied);
    candidates.truncate(FULL_SCAN_SUGGESTION_CAP);
    candidates
}

/// Up to [`ANCHORED_SUGGESTION_CAP`] free slots, ordered by proximity to the
/// originally requested start time. Used for near-miss failures where the
/// client asked for a time just outside the legal window.
pub fn suggest_slots_near(
    window: TimeRange,
    duration_minutes: u32,
    step_minutes: u32,
    occupied: &[TimeRange],
    anchor: NaiveTime,
) -> Vec<NaiveTime> {
    let mut candidates = scan_candidates(window, duration_minutes, step_minutes, occupied);
    let anchor_minute = minute_of_day(anchor);
    candidates.sort_by_key(|c| ((minute_of_day(*c) - anchor_minute).abs(), minute_of_day(*c)));
    candidates.truncate(ANCHORED_SUGGESTION_CAP);
    candidates
}
