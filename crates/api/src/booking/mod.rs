//! Booking engine orchestration.
//!
//! [`availability`] composes the calendar, appointment, and block stores
//! into the pure checker's context; [`holds`] layers the hold lifecycle and
//! its conflict detection on top. Handlers stay thin and call into here.

pub mod availability;
pub mod holds;

use lumea_core::error::CoreError;
use lumea_core::types::DbId;
use lumea_db::repositories::DirectoryRepo;
use sqlx::PgPool;

use crate::error::AppResult;

/// 404 for operations addressing a salon that does not exist, before any
/// lazy seeding can insert rows for it.
pub async fn ensure_salon(pool: &PgPool, salon_id: DbId) -> AppResult<()> {
    DirectoryRepo::find_salon(pool, salon_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Salon",
            id: salon_id,
        })?;
    Ok(())
}
