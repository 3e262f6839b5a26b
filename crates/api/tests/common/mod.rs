//! Shared helpers for API integration tests: full-stack app construction,
//! request/response plumbing, and database fixtures.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use lumea_api::config::ServerConfig;
use lumea_api::routes;
use lumea_api::state::AppState;
use lumea_core::timegrid::parse_hhmm;
use lumea_core::types::DbId;
use lumea_db::models::directory::CreateService;
use lumea_db::models::schedule::UpdateScheduleDay;
use lumea_db::repositories::{DirectoryRepo, ScheduleRepo};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        hold_sweep_interval_secs: 60,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();

    let state = AppState {
        pool,
        config: Arc::new(config),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// Build a request with an optional JSON body.
pub fn json_request(method: Method, uri: &str, body: Option<serde_json::Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(json_request(Method::GET, uri, None))
        .await
        .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(json_request(Method::POST, uri, Some(body)))
        .await
        .unwrap()
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(json_request(Method::PUT, uri, Some(body)))
        .await
        .unwrap()
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(json_request(Method::DELETE, uri, None))
        .await
        .unwrap()
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Seeded directory rows used by most scenarios:
/// - salon with the default template (closed Sunday, 08:00-19:00 otherwise)
/// - one active professional working 09:00-17:00 Tuesday-Saturday
/// - one active 60-minute service bookable online
pub struct Fixture {
    pub salon_id: DbId,
    pub professional_id: DbId,
    pub service_id: DbId,
}

pub async fn seed_fixture(pool: &PgPool) -> Fixture {
    let salon = DirectoryRepo::create_salon(pool, "Studio Aurora")
        .await
        .unwrap();
    let professional = DirectoryRepo::create_professional(pool, salon.id, "Marina", true)
        .await
        .unwrap();
    let service = DirectoryRepo::create_service(
        pool,
        &CreateService {
            salon_id: salon.id,
            name: "Cut & Finish".to_string(),
            duration_minutes: 60,
            is_active: Some(true),
            allow_online_booking: Some(true),
        },
    )
    .await
    .unwrap();

    // Salon defaults seed lazily on first read.
    ScheduleRepo::salon_week(pool, salon.id).await.unwrap();

    for weekday in 0..=6i16 {
        let working = weekday >= 2;
        let day = UpdateScheduleDay {
            weekday,
            is_open: working,
            open_time: working.then(|| parse_hhmm("09:00").unwrap()),
            close_time: working.then(|| parse_hhmm("17:00").unwrap()),
        };
        ScheduleRepo::upsert_professional_day(pool, professional.id, &day)
            .await
            .unwrap();
    }

    Fixture {
        salon_id: salon.id,
        professional_id: professional.id,
        service_id: service.id,
    }
}

/// Force a hold's expiry into the past, simulating an abandoned checkout.
pub async fn force_hold_expiry(pool: &PgPool, hold_id: i64) {
    sqlx::query("UPDATE booking_holds SET expires_at = NOW() - INTERVAL '1 minute' WHERE id = $1")
        .bind(hold_id)
        .execute(pool)
        .await
        .unwrap();
}
