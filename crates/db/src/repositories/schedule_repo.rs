//! Repository for the `salon_schedules` and `professional_schedules` tables.

use lumea_core::types::DbId;
use sqlx::PgPool;

use crate::models::schedule::{ProfessionalScheduleDay, SalonScheduleDay, UpdateScheduleDay};

const SALON_COLUMNS: &str = "id, salon_id, weekday, is_open, open_time, close_time, \
                             created_at, updated_at";

const PROFESSIONAL_COLUMNS: &str = "id, professional_id, weekday, is_working, start_time, \
                                    end_time, created_at, updated_at";

/// Weekly templates for salons and professionals.
pub struct ScheduleRepo;

impl ScheduleRepo {
    /// Seed the default salon template if no rows exist yet: closed Sunday,
    /// 08:00-19:00 the other six days. Idempotent.
    pub async fn ensure_salon_defaults(pool: &PgPool, salon_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO salon_schedules (salon_id, weekday, is_open, open_time, close_time)
             SELECT $1, d.weekday, d.weekday <> 0,
                    CASE WHEN d.weekday <> 0 THEN TIME '08:00' END,
                    CASE WHEN d.weekday <> 0 THEN TIME '19:00' END
             FROM generate_series(0, 6) AS d(weekday)
             ON CONFLICT (salon_id, weekday) DO NOTHING",
        )
        .bind(salon_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Fetch the salon's full week, seeding defaults on first access.
    pub async fn salon_week(
        pool: &PgPool,
        salon_id: DbId,
    ) -> Result<Vec<SalonScheduleDay>, sqlx::Error> {
        Self::ensure_salon_defaults(pool, salon_id).await?;
        let query = format!(
            "SELECT {SALON_COLUMNS} FROM salon_schedules
             WHERE salon_id = $1 ORDER BY weekday"
        );
        sqlx::query_as::<_, SalonScheduleDay>(&query)
            .bind(salon_id)
            .fetch_all(pool)
            .await
    }

    /// Overwrite one weekday of the salon template.
    pub async fn upsert_salon_day(
        pool: &PgPool,
        salon_id: DbId,
        input: &UpdateScheduleDay,
    ) -> Result<SalonScheduleDay, sqlx::Error> {
        let query = format!(
            "INSERT INTO salon_schedules (salon_id, weekday, is_open, open_time, close_time)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (salon_id, weekday) DO UPDATE
             SET is_open = EXCLUDED.is_open,
                 open_time = EXCLUDED.open_time,
                 close_time = EXCLUDED.close_time,
                 updated_at = NOW()
             RETURNING {SALON_COLUMNS}"
        );
        sqlx::query_as::<_, SalonScheduleDay>(&query)
            .bind(salon_id)
            .bind(input.weekday)
            .bind(input.is_open)
            .bind(input.open_time)
            .bind(input.close_time)
            .fetch_one(pool)
            .await
    }

    /// Fetch the professional's full week. No lazy seeding here: a missing
    /// row is a meaningful "no constraint" state for the checker.
    pub async fn professional_week(
        pool: &PgPool,
        professional_id: DbId,
    ) -> Result<Vec<ProfessionalScheduleDay>, sqlx::Error> {
        let query = format!(
            "SELECT {PROFESSIONAL_COLUMNS} FROM professional_schedules
             WHERE professional_id = $1 ORDER BY weekday"
        );
        sqlx::query_as::<_, ProfessionalScheduleDay>(&query)
            .bind(professional_id)
            .fetch_all(pool)
            .await
    }

    /// Overwrite one weekday of a professional's template.
    pub async fn upsert_professional_day(
        pool: &PgPool,
        professional_id: DbId,
        input: &UpdateScheduleDay,
    ) -> Result<ProfessionalScheduleDay, sqlx::Error> {
        let query = format!(
            "INSERT INTO professional_schedules (professional_id, weekday, is_working, start_time, end_time)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (professional_id, weekday) DO UPDATE
             SET is_working = EXCLUDED.is_working,
                 start_time = EXCLUDED.start_time,
                 end_time = EXCLUDED.end_time,
                 updated_at = NOW()
             RETURNING {PROFESSIONAL_COLUMNS}"
        );
        sqlx::query_as::<_, ProfessionalScheduleDay>(&query)
            .bind(professional_id)
            .bind(input.weekday)
            .bind(input.is_open)
            .bind(input.open_time)
            .bind(input.close_time)
            .fetch_one(pool)
            .await
    }

    /// Copy the salon's weekly template onto a professional, used at
    /// onboarding. Existing professional rows are overwritten.
    pub async fn seed_professional_from_salon(
        pool: &PgPool,
        professional_id: DbId,
        salon_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        Self::ensure_salon_defaults(pool, salon_id).await?;
        let result = sqlx::query(
            "INSERT INTO professional_schedules (professional_id, weekday, is_working, start_time, end_time)
             SELECT $1, weekday, is_open, open_time, close_time
             FROM salon_schedules WHERE salon_id = $2
             ON CONFLICT (professional_id, weekday) DO UPDATE
             SET is_working = EXCLUDED.is_working,
                 start_time = EXCLUDED.start_time,
                 end_time = EXCLUDED.end_time,
                 updated_at = NOW()",
        )
        .bind(professional_id)
        .bind(salon_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
