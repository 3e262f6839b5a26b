//! Integration tests for the availability endpoint.
//!
//! Fixture geometry: salon open 08:00-19:00 Monday-Saturday (Sunday closed),
//! professional working 09:00-17:00 Tuesday-Saturday. 2025-06-01 is a Sunday.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_json, seed_fixture};
use lumea_core::timegrid::parse_hhmm;
use lumea_db::models::appointment::CreateAppointment;
use lumea_db::repositories::AppointmentRepo;
use serde_json::json;
use sqlx::PgPool;

fn availability_uri(
    salon_id: i64,
    professional_id: i64,
    date: &str,
    start_time: &str,
    duration: u32,
) -> String {
    format!(
        "/api/v1/salons/{salon_id}/availability?professional_id={professional_id}\
         &date={date}&start_time={start_time}&duration_minutes={duration}"
    )
}

// ---------------------------------------------------------------------------
// Test: a slot inside both windows on a working day is available
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn open_slot_on_working_day_is_available(pool: PgPool) {
    let fx = seed_fixture(&pool).await;
    let app = common::build_test_app(pool);

    // 2025-06-03 is a Tuesday.
    let uri = availability_uri(fx.salon_id, fx.professional_id, "2025-06-03", "10:00", 60);
    let response = get(app, &uri).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["available"], true);
    assert!(json["reason"].is_null());
    assert!(json["suggested_slots"].is_null());
}

// ---------------------------------------------------------------------------
// Test: Sunday is rejected by the salon check before professional checks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn sunday_reports_salon_closed(pool: PgPool) {
    let fx = seed_fixture(&pool).await;
    let app = common::build_test_app(pool);

    let uri = availability_uri(fx.salon_id, fx.professional_id, "2025-06-01", "10:00", 60);
    let response = get(app, &uri).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["available"], false);
    assert_eq!(json["reason"], "SALON_CLOSED");
}

// ---------------------------------------------------------------------------
// Test: Monday the salon is open but the professional is off
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn off_day_reports_professional_not_working(pool: PgPool) {
    let fx = seed_fixture(&pool).await;
    let app = common::build_test_app(pool);

    // 2025-06-02 is a Monday: salon open, professional off.
    let uri = availability_uri(fx.salon_id, fx.professional_id, "2025-06-02", "10:00", 60);
    let response = get(app, &uri).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["available"], false);
    assert_eq!(json["reason"], "PROFESSIONAL_NOT_WORKING");
}

// ---------------------------------------------------------------------------
// Test: service running past the professional's end of day is rejected with
// suggestions constrained to the remaining feasible window
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn overrunning_slot_reports_exceeds_work_hours_with_suggestions(pool: PgPool) {
    let fx = seed_fixture(&pool).await;
    let app = common::build_test_app(pool);

    // 16:30 + 60min ends 17:30, past the professional's 17:00 finish.
    let uri = availability_uri(fx.salon_id, fx.professional_id, "2025-06-03", "16:30", 60);
    let response = get(app, &uri).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["available"], false);
    assert_eq!(json["reason"], "EXCEEDS_WORK_HOURS");

    // Every suggestion must fit a 60-minute service inside 09:00-17:00.
    let slots = json["suggested_slots"].as_array().expect("suggestions");
    assert!(!slots.is_empty());
    for slot in slots {
        let start = parse_hhmm(slot.as_str().unwrap()).unwrap();
        assert!(start >= parse_hhmm("09:00").unwrap());
        assert!(start <= parse_hhmm("16:00").unwrap());
    }
}

// ---------------------------------------------------------------------------
// Test: an existing appointment occupies the slot; touching slots do not
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn booked_slot_reports_slot_occupied(pool: PgPool) {
    let fx = seed_fixture(&pool).await;

    AppointmentRepo::create(
        &pool,
        &CreateAppointment {
            salon_id: fx.salon_id,
            professional_id: fx.professional_id,
            client_name: "Ana".to_string(),
            client_phone: "+5511999990000".to_string(),
            date: "2025-06-03".parse().unwrap(),
            start_time: parse_hhmm("10:00").unwrap(),
            end_time: parse_hhmm("11:00").unwrap(),
            status: None,
        },
    )
    .await
    .unwrap();

    let app = common::build_test_app(pool);

    // Overlapping request is denied with alternatives.
    let uri = availability_uri(fx.salon_id, fx.professional_id, "2025-06-03", "10:30", 60);
    let response = get(app.clone(), &uri).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["available"], false);
    assert_eq!(json["reason"], "SLOT_OCCUPIED");
    assert!(json["suggested_slots"].as_array().is_some_and(|s| !s.is_empty()));

    // A slot ending exactly where the appointment starts is fine.
    let uri = availability_uri(fx.salon_id, fx.professional_id, "2025-06-03", "09:00", 60);
    let response = get(app, &uri).await;
    let json = body_json(response).await;
    assert_eq!(json["available"], true);
}

// ---------------------------------------------------------------------------
// Test: an approved all-day block makes the whole day unavailable
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn all_day_block_reports_professional_blocked(pool: PgPool) {
    let fx = seed_fixture(&pool).await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app.clone(),
        &format!("/api/v1/professionals/{}/blocks", fx.professional_id),
        json!({
            "start_date": "2025-06-03",
            "end_date": "2025-06-03",
            "title": "Course day"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let uri = availability_uri(fx.salon_id, fx.professional_id, "2025-06-03", "10:00", 60);
    let response = get(app, &uri).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["available"], false);
    assert_eq!(json["reason"], "PROFESSIONAL_BLOCKED");
}

// ---------------------------------------------------------------------------
// Test: malformed inputs are 400s, not verdicts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn malformed_start_time_returns_400(pool: PgPool) {
    let fx = seed_fixture(&pool).await;
    let app = common::build_test_app(pool);

    let uri = availability_uri(fx.salon_id, fx.professional_id, "2025-06-03", "25:99", 60);
    let response = get(app, &uri).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn slot_crossing_midnight_returns_400(pool: PgPool) {
    let fx = seed_fixture(&pool).await;
    let app = common::build_test_app(pool);

    let uri = availability_uri(fx.salon_id, fx.professional_id, "2025-06-03", "23:30", 60);
    let response = get(app, &uri).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: unknown professional is a 404
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_professional_returns_404(pool: PgPool) {
    let fx = seed_fixture(&pool).await;
    let app = common::build_test_app(pool);

    let uri = availability_uri(fx.salon_id, 999_999, "2025-06-03", "10:00", 60);
    let response = get(app, &uri).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
