//! Availability orchestration: fetch the constraint sources, hand them to
//! the pure checker.
//!
//! Reads are deliberately unsynchronized. The calendar store is read-heavy
//! and admin writes to it are rare; a check racing a schedule change may use
//! the old template, which is acceptable. The authoritative re-validation
//! happens inside hold creation.

use chrono::{NaiveDate, NaiveTime};
use lumea_core::availability::{
    evaluate, AvailabilityContext, AvailabilityResult, DayHours, SlotRequest,
};
use lumea_core::error::CoreError;
use lumea_core::timegrid::{weekday_index, TimeRange, DEFAULT_SLOT_GRANULARITY_MINUTES};
use lumea_core::types::DbId;
use lumea_db::models::schedule::{ProfessionalScheduleDay, SalonScheduleDay};
use lumea_db::repositories::{
    AppointmentRepo, BlockRepo, DirectoryRepo, ScheduleRepo, SettingsRepo,
};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

/// All-day blocks span 00:00-23:59 for conflict purposes.
fn all_day() -> TimeRange {
    TimeRange::new(
        NaiveTime::from_hms_opt(0, 0, 0).expect("00:00 is valid"),
        NaiveTime::from_hms_opt(23, 59, 0).expect("23:59 is valid"),
    )
}

fn salon_day_hours(day: Option<&SalonScheduleDay>) -> DayHours {
    match day {
        Some(d) if d.is_open => DayHours {
            open: true,
            window: d
                .open_time
                .zip(d.close_time)
                .map(|(open, close)| TimeRange::new(open, close)),
        },
        _ => DayHours {
            open: false,
            window: None,
        },
    }
}

fn professional_day_hours(day: &ProfessionalScheduleDay) -> DayHours {
    DayHours {
        open: day.is_working,
        window: day
            .start_time
            .zip(day.end_time)
            .filter(|_| day.is_working)
            .map(|(start, end)| TimeRange::new(start, end)),
    }
}

/// Assemble the checker's context for (salon, professional, date).
pub async fn build_context(
    pool: &PgPool,
    salon_id: DbId,
    professional_id: DbId,
    date: NaiveDate,
) -> AppResult<AvailabilityContext> {
    let weekday = weekday_index(date);

    DirectoryRepo::find_professional(pool, salon_id, professional_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Professional",
            id: professional_id,
        }))?;

    let settings = SettingsRepo::get_or_create(pool, salon_id).await?;
    let salon_week = ScheduleRepo::salon_week(pool, salon_id).await?;
    let professional_week = ScheduleRepo::professional_week(pool, professional_id).await?;
    let blocks = BlockRepo::approved_for_date(pool, professional_id, date).await?;
    let appointments = AppointmentRepo::occupying_for_day(pool, professional_id, date).await?;

    let salon_day = salon_day_hours(salon_week.iter().find(|d| d.weekday == weekday));
    let salon_open_weekdays: Vec<i16> = salon_week
        .iter()
        .filter(|d| d.is_open)
        .map(|d| d.weekday)
        .collect();

    // A professional with no row for this weekday is unconstrained.
    let professional_day = professional_week
        .iter()
        .find(|d| d.weekday == weekday)
        .map(professional_day_hours);
    let professional_work_weekdays: Vec<i16> = professional_week
        .iter()
        .filter(|d| d.is_working)
        .map(|d| d.weekday)
        .collect();

    let blocks = blocks
        .iter()
        .map(|b| match (b.start_time, b.end_time) {
            (Some(start), Some(end)) => TimeRange::new(start, end),
            _ => all_day(),
        })
        .collect();

    let booked = appointments
        .iter()
        .map(|a| TimeRange::new(a.start_time, a.end_time))
        .collect();

    let granularity = u32::try_from(settings.slot_granularity_minutes)
        .unwrap_or(DEFAULT_SLOT_GRANULARITY_MINUTES);

    Ok(AvailabilityContext {
        salon_day,
        salon_open_weekdays,
        professional_day,
        professional_work_weekdays,
        blocks,
        booked,
        slot_granularity_minutes: granularity,
    })
}

/// Decide whether the requested slot is legal by business rules.
///
/// Read-only and safe to call repeatedly; holds are intentionally not
/// consulted (the hold manager owns claim conflicts).
pub async fn check_availability(
    pool: &PgPool,
    salon_id: DbId,
    professional_id: DbId,
    date: NaiveDate,
    start_time: NaiveTime,
    duration_minutes: u32,
) -> AppResult<AvailabilityResult> {
    let ctx = build_context(pool, salon_id, professional_id, date).await?;
    let result = evaluate(
        SlotRequest {
            date,
            start_time,
            duration_minutes,
        },
        &ctx,
    )?;

    if !result.available {
        tracing::debug!(
            salon_id,
            professional_id,
            %date,
            reason = ?result.reason,
            "Slot rejected"
        );
    }

    Ok(result)
}
