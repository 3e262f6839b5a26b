//! Integration tests for the checkout-hold lifecycle:
//! create, conflict handling, lazy expiry, extend, release, convert,
//! session recovery, and the background sweep.

mod common;

use axum::http::StatusCode;
use common::{body_json, force_hold_expiry, get, post_json, put_json, seed_fixture};
use lumea_core::hold::max_lifetime_minutes;
use lumea_core::timegrid::parse_hhmm;
use lumea_core::types::Timestamp;
use lumea_db::models::appointment::CreateAppointment;
use lumea_db::repositories::{AppointmentRepo, HoldRepo};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

fn holds_uri(salon_id: i64) -> String {
    format!("/api/v1/salons/{salon_id}/holds")
}

fn hold_body(fx: &common::Fixture, start_time: &str) -> serde_json::Value {
    json!({
        "professional_id": fx.professional_id,
        "service_id": fx.service_id,
        "date": "2025-06-03",
        "start_time": start_time,
        "client_name": "Beatriz",
        "client_phone": "+5511988887777"
    })
}

async fn hold_status_in_db(pool: &PgPool, hold_id: i64) -> String {
    sqlx::query_scalar("SELECT status FROM booking_holds WHERE id = $1")
        .bind(hold_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Test: creating a hold returns 201 with a ticking expiry and computed end
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn create_hold_returns_summary(pool: PgPool) {
    let fx = seed_fixture(&pool).await;
    let app = common::build_test_app(pool);

    let response = post_json(app, &holds_uri(fx.salon_id), hold_body(&fx, "10:00")).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ACTIVE");
    assert_eq!(json["start_time"], "10:00:00");
    // End time is derived from the 60-minute service, not client input.
    assert_eq!(json["end_time"], "11:00:00");
    // Default TTL is 10 minutes.
    let remaining = json["expires_in_seconds"].as_i64().unwrap();
    assert!(remaining > 0 && remaining <= 600);
    // A session id is generated when the client does not supply one.
    assert!(!json["session_id"].as_str().unwrap().is_empty());
    assert!(json.get("appointment_id").is_none());
}

// ---------------------------------------------------------------------------
// Test: overlapping hold is refused, touching hold is not
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn overlapping_hold_returns_409(pool: PgPool) {
    let fx = seed_fixture(&pool).await;
    let app = common::build_test_app(pool);

    let first = post_json(app.clone(), &holds_uri(fx.salon_id), hold_body(&fx, "10:00")).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    // 10:30-11:30 overlaps the first claim's 10:00-11:00.
    let second = post_json(app.clone(), &holds_uri(fx.salon_id), hold_body(&fx, "10:30")).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let json = body_json(second).await;
    assert_eq!(json["code"], "CONFLICT");

    // 11:00-12:00 merely touches the boundary and must succeed.
    let touching = post_json(app, &holds_uri(fx.salon_id), hold_body(&fx, "11:00")).await;
    assert_eq!(touching.status(), StatusCode::CREATED);
}

// ---------------------------------------------------------------------------
// Test: existing appointments block holds; cancelled ones do not
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn appointment_conflict_returns_409(pool: PgPool) {
    let fx = seed_fixture(&pool).await;

    AppointmentRepo::create(
        &pool,
        &CreateAppointment {
            salon_id: fx.salon_id,
            professional_id: fx.professional_id,
            client_name: "Carla".to_string(),
            client_phone: "+5511977776666".to_string(),
            date: "2025-06-03".parse().unwrap(),
            start_time: parse_hhmm("10:00").unwrap(),
            end_time: parse_hhmm("11:00").unwrap(),
            status: None,
        },
    )
    .await
    .unwrap();

    AppointmentRepo::create(
        &pool,
        &CreateAppointment {
            salon_id: fx.salon_id,
            professional_id: fx.professional_id,
            client_name: "Dani".to_string(),
            client_phone: "+5511966665555".to_string(),
            date: "2025-06-03".parse().unwrap(),
            start_time: parse_hhmm("14:00").unwrap(),
            end_time: parse_hhmm("15:00").unwrap(),
            status: Some("CANCELLED".to_string()),
        },
    )
    .await
    .unwrap();

    let app = common::build_test_app(pool);

    let blocked = post_json(app.clone(), &holds_uri(fx.salon_id), hold_body(&fx, "10:30")).await;
    assert_eq!(blocked.status(), StatusCode::CONFLICT);

    // The cancelled appointment no longer occupies its slot.
    let free = post_json(app, &holds_uri(fx.salon_id), hold_body(&fx, "14:00")).await;
    assert_eq!(free.status(), StatusCode::CREATED);
}

// ---------------------------------------------------------------------------
// Test: gating failures before the conflict check
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_service_returns_404(pool: PgPool) {
    let fx = seed_fixture(&pool).await;
    let app = common::build_test_app(pool);

    let mut body = hold_body(&fx, "10:00");
    body["service_id"] = json!(999_999);
    let response = post_json(app, &holds_uri(fx.salon_id), body).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn disabled_online_booking_returns_400(pool: PgPool) {
    let fx = seed_fixture(&pool).await;
    let app = common::build_test_app(pool);

    let response = put_json(
        app.clone(),
        &format!("/api/v1/salons/{}/booking-settings", fx.salon_id),
        json!({ "online_booking_enabled": false }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(app, &holds_uri(fx.salon_id), hold_body(&fx, "10:00")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Test: lazy expiry on read is persisted and idempotent
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn expired_hold_read_persists_terminal_state(pool: PgPool) {
    let fx = seed_fixture(&pool).await;
    let app = common::build_test_app(pool.clone());

    let created = post_json(app.clone(), &holds_uri(fx.salon_id), hold_body(&fx, "10:00")).await;
    let hold_id = body_json(created).await["id"].as_i64().unwrap();

    force_hold_expiry(&pool, hold_id).await;

    // A plain fetch never hides the hold; it reports the expiry and
    // persists the terminal state as a side effect.
    let uri = format!("{}/{}", holds_uri(fx.salon_id), hold_id);
    let response = get(app.clone(), &uri).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "EXPIRED");
    assert_eq!(json["expires_in_seconds"], 0);

    assert_eq!(hold_status_in_db(&pool, hold_id).await, "EXPIRED");

    // Repeated reads report the same state.
    let response = get(app.clone(), &uri).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "EXPIRED");

    // Mutating operations refuse the dead claim with 410.
    let extend_uri = format!("{uri}/extend");
    let response = post_json(app, &extend_uri, json!({})).await;
    assert_eq!(response.status(), StatusCode::GONE);
    assert_eq!(body_json(response).await["code"], "HOLD_EXPIRED");
}

// ---------------------------------------------------------------------------
// Test: an expired slot is claimable by another session
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn expired_hold_frees_the_slot(pool: PgPool) {
    let fx = seed_fixture(&pool).await;
    let app = common::build_test_app(pool.clone());

    let created = post_json(app.clone(), &holds_uri(fx.salon_id), hold_body(&fx, "10:00")).await;
    let hold_id = body_json(created).await["id"].as_i64().unwrap();

    // Still within TTL: the slot is taken.
    let retry = post_json(app.clone(), &holds_uri(fx.salon_id), hold_body(&fx, "10:00")).await;
    assert_eq!(retry.status(), StatusCode::CONFLICT);

    force_hold_expiry(&pool, hold_id).await;

    let retry = post_json(app, &holds_uri(fx.salon_id), hold_body(&fx, "10:00")).await;
    assert_eq!(retry.status(), StatusCode::CREATED);
}

// ---------------------------------------------------------------------------
// Test: extension is capped at 1.5x the base duration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn extension_cap_rejects_second_extension(pool: PgPool) {
    let fx = seed_fixture(&pool).await;
    let app = common::build_test_app(pool);

    let created = post_json(app.clone(), &holds_uri(fx.salon_id), hold_body(&fx, "10:00")).await;
    let hold_id = body_json(created).await["id"].as_i64().unwrap();
    let uri = format!("{}/{}/extend", holds_uri(fx.salon_id), hold_id);

    // Base 10 minutes + default 5-minute extension hits the 15-minute cap.
    let response = post_json(app.clone(), &uri, json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["expires_in_seconds"].as_i64().unwrap() > 600);

    // Any further extension would exceed 1.5x the base duration.
    let response = post_json(app, &uri, json!({ "extra_minutes": 5 })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Test: the lifetime cap is enforced by the update itself
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn stacked_extensions_cannot_exceed_the_cap(pool: PgPool) {
    let fx = seed_fixture(&pool).await;
    let app = common::build_test_app(pool.clone());

    let created = post_json(app, &holds_uri(fx.salon_id), hold_body(&fx, "10:00")).await;
    let hold_id = body_json(created).await["id"].as_i64().unwrap();

    // Two writers that both passed the pre-check race on the write. The
    // update predicate admits the first 5-minute extension (10 -> 15
    // minutes of lifetime) and refuses the second no matter what its
    // writer read beforehand.
    let cap = max_lifetime_minutes(10);
    let first = HoldRepo::extend(&pool, hold_id, 5, cap).await.unwrap();
    let first = first.expect("first extension fits the cap");

    let second = HoldRepo::extend(&pool, hold_id, 5, cap).await.unwrap();
    assert!(second.is_none());

    // The refused extension left the expiry untouched.
    let expires_at: Timestamp =
        sqlx::query_scalar("SELECT expires_at FROM booking_holds WHERE id = $1")
            .bind(hold_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(expires_at, first.expires_at);
}

// ---------------------------------------------------------------------------
// Test: release is terminal
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn release_then_second_release_conflicts(pool: PgPool) {
    let fx = seed_fixture(&pool).await;
    let app = common::build_test_app(pool.clone());

    let created = post_json(app.clone(), &holds_uri(fx.salon_id), hold_body(&fx, "10:00")).await;
    let hold_id = body_json(created).await["id"].as_i64().unwrap();
    let uri = format!("{}/{}/release", holds_uri(fx.salon_id), hold_id);

    let response = post_json(app.clone(), &uri, json!({})).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(hold_status_in_db(&pool, hold_id).await, "RELEASED");

    // RELEASED is terminal.
    let response = post_json(app.clone(), &uri, json!({})).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_STATE");

    // The released hold stays readable by id.
    let response = get(
        app.clone(),
        &format!("{}/{}", holds_uri(fx.salon_id), hold_id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "RELEASED");

    // And the slot is free for the next session.
    let retry = post_json(app, &holds_uri(fx.salon_id), hold_body(&fx, "10:00")).await;
    assert_eq!(retry.status(), StatusCode::CREATED);
}

// ---------------------------------------------------------------------------
// Test: conversion stamps the appointment and refuses a second attempt
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn convert_hold_is_single_shot(pool: PgPool) {
    let fx = seed_fixture(&pool).await;

    let appointment = AppointmentRepo::create(
        &pool,
        &CreateAppointment {
            salon_id: fx.salon_id,
            professional_id: fx.professional_id,
            client_name: "Beatriz".to_string(),
            client_phone: "+5511988887777".to_string(),
            date: "2025-06-03".parse().unwrap(),
            start_time: parse_hhmm("10:00").unwrap(),
            end_time: parse_hhmm("11:00").unwrap(),
            status: None,
        },
    )
    .await
    .unwrap();

    let app = common::build_test_app(pool.clone());

    // The hold predates the appointment in a real flow; create it directly
    // against a different slot to sidestep the conflict check.
    let created = post_json(app.clone(), &holds_uri(fx.salon_id), hold_body(&fx, "14:00")).await;
    let hold_id = body_json(created).await["id"].as_i64().unwrap();
    let uri = format!("{}/{}/convert", holds_uri(fx.salon_id), hold_id);

    let response = post_json(
        app.clone(),
        &uri,
        json!({ "appointment_id": appointment.id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "CONVERTED");
    assert_eq!(json["appointment_id"], appointment.id);
    assert_eq!(hold_status_in_db(&pool, hold_id).await, "CONVERTED");

    // CONVERTED is terminal.
    let response = post_json(app.clone(), &uri, json!({ "appointment_id": appointment.id })).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_STATE");

    // The receipt remains readable by id with the linking appointment.
    let response = get(app, &format!("{}/{}", holds_uri(fx.salon_id), hold_id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "CONVERTED");
    assert_eq!(json["appointment_id"], appointment.id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn convert_with_unknown_appointment_returns_404(pool: PgPool) {
    let fx = seed_fixture(&pool).await;
    let app = common::build_test_app(pool.clone());

    let created = post_json(app.clone(), &holds_uri(fx.salon_id), hold_body(&fx, "10:00")).await;
    let hold_id = body_json(created).await["id"].as_i64().unwrap();

    let uri = format!("{}/{}/convert", holds_uri(fx.salon_id), hold_id);
    let response = post_json(app, &uri, json!({ "appointment_id": 999_999 })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The failed conversion must not consume the hold.
    assert_eq!(hold_status_in_db(&pool, hold_id).await, "ACTIVE");
}

// ---------------------------------------------------------------------------
// Test: session recovery lists a session's holds and nothing else
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn session_listing_returns_only_that_session(pool: PgPool) {
    let fx = seed_fixture(&pool).await;
    let app = common::build_test_app(pool);

    let mut body = hold_body(&fx, "10:00");
    body["session_id"] = json!("session-a");
    let response = post_json(app.clone(), &holds_uri(fx.salon_id), body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let mut body = hold_body(&fx, "11:00");
    body["session_id"] = json!("session-a");
    let response = post_json(app.clone(), &holds_uri(fx.salon_id), body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let mut body = hold_body(&fx, "13:00");
    body["session_id"] = json!("session-b");
    let response = post_json(app.clone(), &holds_uri(fx.salon_id), body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let uri = format!("{}?session_id=session-a", holds_uri(fx.salon_id));
    let response = get(app, &uri).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let holds = json["data"].as_array().unwrap();
    assert_eq!(holds.len(), 2);
    for hold in holds {
        assert_eq!(hold["session_id"], "session-a");
    }
}

// ---------------------------------------------------------------------------
// Test: the sweep expires overdue holds exactly once
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn sweep_expires_overdue_holds_idempotently(pool: PgPool) {
    let fx = seed_fixture(&pool).await;
    let app = common::build_test_app(pool.clone());

    let created = post_json(app, &holds_uri(fx.salon_id), hold_body(&fx, "10:00")).await;
    let hold_id = body_json(created).await["id"].as_i64().unwrap();

    assert_eq!(HoldRepo::expire_overdue(&pool).await.unwrap(), 0);

    force_hold_expiry(&pool, hold_id).await;

    assert_eq!(HoldRepo::expire_overdue(&pool).await.unwrap(), 1);
    assert_eq!(hold_status_in_db(&pool, hold_id).await, "EXPIRED");

    // Already-terminal rows are not touched again.
    assert_eq!(HoldRepo::expire_overdue(&pool).await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Test: two simultaneous claims on one slot produce exactly one hold
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn concurrent_creates_admit_exactly_one(pool: PgPool) {
    let fx = seed_fixture(&pool).await;
    let app = common::build_test_app(pool);

    let uri = holds_uri(fx.salon_id);
    let req_a = common::json_request(
        axum::http::Method::POST,
        &uri,
        Some(hold_body(&fx, "10:00")),
    );
    let req_b = common::json_request(
        axum::http::Method::POST,
        &uri,
        Some(hold_body(&fx, "10:30")),
    );

    let (res_a, res_b) = tokio::join!(app.clone().oneshot(req_a), app.oneshot(req_b));
    let statuses = [res_a.unwrap().status(), res_b.unwrap().status()];

    assert!(statuses.contains(&StatusCode::CREATED));
    assert!(statuses.contains(&StatusCode::CONFLICT));
}
