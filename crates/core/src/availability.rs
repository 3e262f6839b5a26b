//! The availability decision function.
//!
//! `evaluate` is a pure function over already-fetched schedule data: the API
//! layer assembles an [`AvailabilityContext`] from the stores and the checker
//! reduces it to a single verdict. Constraints are evaluated in a fixed
//! priority order and evaluation stops at the first violation, so exactly
//! one reason is ever reported; there is no point suggesting professional
//! slots when the salon itself is closed that day.
//!
//! "Not available" is a normal, fully-described return value, never an
//! error: availability checks are expected to fail often and callers need
//! structured diagnostics rather than exception handling.
//!
//! Holds are deliberately out of scope here. The checker answers "is this
//! slot legal by business rules"; "is it currently claimed" is the hold
//! manager's composition of this checker with hold-conflict detection.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use serde_json::json;

use crate::error::CoreError;
use crate::timegrid::{
    add_minutes, hhmm, suggest_slots, suggest_slots_near, weekday_index, weekday_name, TimeRange,
};

/// Why a slot was rejected. Exactly one reason accompanies every
/// `available: false` result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnavailableReason {
    SalonClosed,
    ProfessionalNotWorking,
    ProfessionalBlocked,
    ExceedsClosingTime,
    ExceedsWorkHours,
    SlotOccupied,
}

/// Verdict returned by [`evaluate`].
#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityResult {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<UnavailableReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Alternative start times (`HH:MM`), present on time-window and
    /// occupancy violations where alternatives are computable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_slots: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AvailabilityResult {
    fn ok() -> Self {
        Self {
            available: true,
            reason: None,
            message: None,
            suggested_slots: None,
            details: None,
        }
    }

    fn rejected(reason: UnavailableReason, message: String) -> Self {
        Self {
            available: false,
            reason: Some(reason),
            message: Some(message),
            suggested_slots: None,
            details: None,
        }
    }

    fn with_suggestions(mut self, slots: Vec<NaiveTime>) -> Self {
        self.suggested_slots = Some(slots.into_iter().map(hhmm).collect());
        self
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// The slot being evaluated.
#[derive(Debug, Clone, Copy)]
pub struct SlotRequest {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: u32,
}

/// One weekday's opening template, for either the salon or a professional.
#[derive(Debug, Clone, Copy)]
pub struct DayHours {
    pub open: bool,
    /// Present iff `open` is true.
    pub window: Option<TimeRange>,
}

/// Everything the checker needs, fetched up front by the caller.
#[derive(Debug, Clone)]
pub struct AvailabilityContext {
    /// Salon hours for the requested weekday.
    pub salon_day: DayHours,
    /// Weekday indices (0 = Sunday) on which the salon opens, for messages.
    pub salon_open_weekdays: Vec<i16>,
    /// Professional hours for the requested weekday. `None` means no
    /// schedule row exists, which is treated as "no constraint": an
    /// un-configured professional is bookable within salon hours.
    pub professional_day: Option<DayHours>,
    /// Weekday indices on which the professional works, for messages.
    pub professional_work_weekdays: Vec<i16>,
    /// Approved block-offs for the exact date, normalized to time ranges
    /// (all-day blocks become 00:00-23:59).
    pub blocks: Vec<TimeRange>,
    /// Occupying appointments for (professional, date): SCHEDULED,
    /// CONFIRMED, or PENDING_CONFIRMATION.
    pub booked: Vec<TimeRange>,
    /// Scan step for suggested slots.
    pub slot_granularity_minutes: u32,
}

fn weekday_list(indices: &[i16]) -> String {
    if indices.is_empty() {
        return "none".to_string();
    }
    indices
        .iter()
        .map(|i| weekday_name(*i))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Decide whether `request` is a legal booking given `ctx`.
///
/// Returns `Err(Validation)` only for malformed input (zero duration or a
/// span that would cross midnight); every business-rule outcome is an
/// `Ok(AvailabilityResult)`.
pub fn evaluate(
    request: SlotRequest,
    ctx: &AvailabilityContext,
) -> Result<AvailabilityResult, CoreError> {
    if request.duration_minutes == 0 {
        return Err(CoreError::Validation(
            "duration_minutes must be positive".to_string(),
        ));
    }
    let end_time = add_minutes(request.start_time, request.duration_minutes).ok_or_else(|| {
        CoreError::Validation(format!(
            "A {}-minute service starting at {} would cross midnight; bookings must end within the same day",
            request.duration_minutes,
            hhmm(request.start_time)
        ))
    })?;
    let requested = TimeRange::new(request.start_time, end_time);
    let weekday = weekday_index(request.date);
    let step = ctx.slot_granularity_minutes;

    // 1. Salon open that weekday at all?
    let Some(salon_window) = ctx.salon_day.window.filter(|_| ctx.salon_day.open) else {
        return Ok(AvailabilityResult::rejected(
            UnavailableReason::SalonClosed,
            format!(
                "The salon is closed on {}. Open days: {}",
                weekday_name(weekday),
                weekday_list(&ctx.salon_open_weekdays)
            ),
        )
        .with_details(json!({ "open_weekdays": ctx.salon_open_weekdays })));
    };

    // 2. Requested start before opening time.
    if request.start_time < salon_window.start {
        return Ok(AvailabilityResult::rejected(
            UnavailableReason::SalonClosed,
            format!(
                "The salon only opens at {} on {}",
                hhmm(salon_window.start),
                weekday_name(weekday)
            ),
        )
        .with_details(json!({ "opens_at": hhmm(salon_window.start) })));
    }

    // 3. Service would run past closing.
    if requested.end > salon_window.end {
        let suggestions = suggest_slots_near(
            salon_window,
            request.duration_minutes,
            step,
            &ctx.booked,
            request.start_time,
        );
        return Ok(AvailabilityResult::rejected(
            UnavailableReason::ExceedsClosingTime,
            format!(
                "A {}-minute service starting at {} would end at {}, after the salon closes at {}",
                request.duration_minutes,
                hhmm(requested.start),
                hhmm(requested.end),
                hhmm(salon_window.end)
            ),
        )
        .with_suggestions(suggestions)
        .with_details(json!({ "closes_at": hhmm(salon_window.end) })));
    }

    // 4-5. Professional constraints, only if a schedule row exists.
    if let Some(prof_day) = &ctx.professional_day {
        let Some(prof_window) = prof_day.window.filter(|_| prof_day.open) else {
            return Ok(AvailabilityResult::rejected(
                UnavailableReason::ProfessionalNotWorking,
                format!(
                    "This professional does not work on {}. Working days: {}",
                    weekday_name(weekday),
                    weekday_list(&ctx.professional_work_weekdays)
                ),
            )
            .with_details(json!({ "work_weekdays": ctx.professional_work_weekdays })));
        };

        if request.start_time < prof_window.start {
            return Ok(AvailabilityResult::rejected(
                UnavailableReason::ProfessionalNotWorking,
                format!(
                    "This professional starts at {} on {}",
                    hhmm(prof_window.start),
                    weekday_name(weekday)
                ),
            )
            .with_details(json!({ "starts_at": hhmm(prof_window.start) })));
        }

        if requested.end > prof_window.end {
            let suggestions = suggest_slots_near(
                prof_window,
                request.duration_minutes,
                step,
                &ctx.booked,
                request.start_time,
            );
            return Ok(AvailabilityResult::rejected(
                UnavailableReason::ExceedsWorkHours,
                format!(
                    "A {}-minute service starting at {} would end at {}, after this professional finishes at {}",
                    request.duration_minutes,
                    hhmm(requested.start),
                    hhmm(requested.end),
                    hhmm(prof_window.end)
                ),
            )
            .with_suggestions(suggestions)
            .with_details(json!({ "finishes_at": hhmm(prof_window.end) })));
        }
    }

    // 6. Approved block-offs.
    if let Some(block) = ctx.blocks.iter().find(|b| requested.overlaps(b)) {
        return Ok(AvailabilityResult::rejected(
            UnavailableReason::ProfessionalBlocked,
            "This professional is unavailable during the requested time".to_string(),
        )
        .with_details(json!({
            "blocked_from": hhmm(block.start),
            "blocked_until": hhmm(block.end),
        })));
    }

    // 7. Existing appointments.
    if ctx.booked.iter().any(|b| requested.overlaps(b)) {
        // Suggest across the tightest window that applies: the
        // professional's hours when configured, otherwise the salon's.
        let scan_window = ctx
            .professional_day
            .as_ref()
            .and_then(|d| d.window.filter(|_| d.open))
            .unwrap_or(salon_window);
        let suggestions = suggest_slots(scan_window, request.duration_minutes, step, &ctx.booked);
        return Ok(AvailabilityResult::rejected(
            UnavailableReason::SlotOccupied,
            "This time slot is already booked".to_string(),
        )
        .with_suggestions(suggestions));
    }

    Ok(AvailabilityResult::ok())
}
