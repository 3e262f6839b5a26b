pub mod health;

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{availability, holds, schedules, settings};
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /salons/{salon_id}/availability            GET           availability check
/// /salons/{salon_id}/holds                   POST, GET     create / list by session
/// /salons/{salon_id}/holds/{id}              GET           fetch any state (lazy expiry)
/// /salons/{salon_id}/holds/{id}/extend       POST
/// /salons/{salon_id}/holds/{id}/release      POST
/// /salons/{salon_id}/holds/{id}/convert      POST
/// /salons/{salon_id}/schedule                GET, PUT      weekly salon template
/// /salons/{salon_id}/booking-settings        GET, PUT
/// /professionals/{id}/schedule               GET, PUT      weekly professional template
/// /professionals/{id}/schedule/seed          POST          copy salon template
/// /professionals/{id}/blocks                 POST, GET
/// /professionals/{id}/blocks/{block_id}      DELETE
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/salons/{salon_id}/availability",
            get(availability::check_availability),
        )
        .route(
            "/salons/{salon_id}/holds",
            post(holds::create_hold).get(holds::list_session_holds),
        )
        .route("/salons/{salon_id}/holds/{id}", get(holds::get_hold))
        .route(
            "/salons/{salon_id}/holds/{id}/extend",
            post(holds::extend_hold),
        )
        .route(
            "/salons/{salon_id}/holds/{id}/release",
            post(holds::release_hold),
        )
        .route(
            "/salons/{salon_id}/holds/{id}/convert",
            post(holds::convert_hold),
        )
        .route(
            "/salons/{salon_id}/schedule",
            get(schedules::get_salon_schedule).put(schedules::update_salon_schedule),
        )
        .route(
            "/salons/{salon_id}/booking-settings",
            get(settings::get_settings).put(settings::update_settings),
        )
        .route(
            "/professionals/{id}/schedule",
            get(schedules::get_professional_schedule)
                .put(schedules::update_professional_schedule),
        )
        .route(
            "/professionals/{id}/schedule/seed",
            post(schedules::seed_professional_schedule),
        )
        .route(
            "/professionals/{id}/blocks",
            post(schedules::create_block).get(schedules::list_blocks),
        )
        .route(
            "/professionals/{id}/blocks/{block_id}",
            delete(schedules::delete_block),
        )
}
