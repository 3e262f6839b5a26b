//! Repository for the `booking_holds` table.
//!
//! Hold creation is the one write that must be atomic with respect to other
//! concurrent creates for the same (professional, date): without exclusion,
//! two sessions can each pass the conflict check and both insert. A plain
//! row lock cannot cover rows that do not exist yet, so `create_exclusive`
//! takes a transaction-scoped advisory lock keyed on (professional, date)
//! before running the conflict queries and the insert.

use lumea_core::hold::HoldStatus;
use lumea_core::types::DbId;
use sqlx::PgPool;

use crate::models::appointment::occupying_status_list;
use crate::models::hold::{Hold, HoldCreateOutcome, NewHold};

const COLUMNS: &str = "id, salon_id, professional_id, service_id, date, start_time, end_time, \
                       status, expires_at, session_id, client_name, client_phone, client_id, \
                       appointment_id, converted_at, created_at, updated_at";

/// Temporary exclusive claims on booking slots.
pub struct HoldRepo;

impl HoldRepo {
    /// Atomically check for conflicts and insert a new ACTIVE hold.
    ///
    /// Within one transaction:
    /// 1. `pg_advisory_xact_lock` on a key derived from (professional, date),
    ///    serializing concurrent creates for the same day while leaving
    ///    unrelated (professional, date) pairs fully concurrent;
    /// 2. overlap check against effectively-active holds
    ///    (`status = ACTIVE AND expires_at > NOW()`);
    /// 3. overlap check against occupying appointments;
    /// 4. insert.
    ///
    /// Both checks use the half-open predicate: touching ranges never
    /// conflict.
    pub async fn create_exclusive(
        pool: &PgPool,
        input: &NewHold,
    ) -> Result<HoldCreateOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1::text || ':' || $2::text, 0))")
            .bind(input.professional_id)
            .bind(input.date)
            .execute(&mut *tx)
            .await?;

        let hold_conflict: Option<DbId> = sqlx::query_scalar(
            "SELECT id FROM booking_holds
             WHERE professional_id = $1
               AND date = $2
               AND status = $3
               AND expires_at > NOW()
               AND start_time < $5
               AND end_time > $4
             LIMIT 1",
        )
        .bind(input.professional_id)
        .bind(input.date)
        .bind(HoldStatus::Active.as_str())
        .bind(input.start_time)
        .bind(input.end_time)
        .fetch_optional(&mut *tx)
        .await?;

        if hold_conflict.is_some() {
            tx.rollback().await?;
            return Ok(HoldCreateOutcome::HoldConflict);
        }

        let query = format!(
            "SELECT id FROM appointments
             WHERE professional_id = $1
               AND date = $2
               AND status IN ({})
               AND start_time < $4
               AND end_time > $3
             LIMIT 1",
            occupying_status_list()
        );
        let appointment_conflict: Option<DbId> = sqlx::query_scalar(&query)
        .bind(input.professional_id)
        .bind(input.date)
        .bind(input.start_time)
        .bind(input.end_time)
        .fetch_optional(&mut *tx)
        .await?;

        if appointment_conflict.is_some() {
            tx.rollback().await?;
            return Ok(HoldCreateOutcome::AppointmentConflict);
        }

        let query = format!(
            "INSERT INTO booking_holds
                 (salon_id, professional_id, service_id, date, start_time, end_time,
                  status, expires_at, session_id, client_name, client_phone, client_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        let hold = sqlx::query_as::<_, Hold>(&query)
            .bind(input.salon_id)
            .bind(input.professional_id)
            .bind(input.service_id)
            .bind(input.date)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(HoldStatus::Active.as_str())
            .bind(input.expires_at)
            .bind(&input.session_id)
            .bind(&input.client_name)
            .bind(&input.client_phone)
            .bind(input.client_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(HoldCreateOutcome::Created(hold))
    }

    pub async fn find_by_id(
        pool: &PgPool,
        salon_id: DbId,
        hold_id: DbId,
    ) -> Result<Option<Hold>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM booking_holds WHERE id = $1 AND salon_id = $2");
        sqlx::query_as::<_, Hold>(&query)
            .bind(hold_id)
            .bind(salon_id)
            .fetch_optional(pool)
            .await
    }

    /// Holds created by one checkout session, newest first. Lets a UI
    /// recover its in-flight holds after a page reload.
    pub async fn list_by_session(
        pool: &PgPool,
        salon_id: DbId,
        session_id: &str,
    ) -> Result<Vec<Hold>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM booking_holds
             WHERE salon_id = $1 AND session_id = $2
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Hold>(&query)
            .bind(salon_id)
            .bind(session_id)
            .fetch_all(pool)
            .await
    }

    /// Push the expiry forward on an ACTIVE, non-expired hold. The lifetime
    /// cap is enforced inside the UPDATE predicate so that concurrent
    /// extensions cannot stack past `max_lifetime_minutes`: each one must
    /// independently leave the total lifetime within the cap or match no
    /// row. Returns the updated row, or `None` if the hold was no longer
    /// extendable.
    pub async fn extend(
        pool: &PgPool,
        hold_id: DbId,
        extra_minutes: i32,
        max_lifetime_minutes: i32,
    ) -> Result<Option<Hold>, sqlx::Error> {
        let query = format!(
            "UPDATE booking_holds
             SET expires_at = expires_at + make_interval(mins => $2), updated_at = NOW()
             WHERE id = $1 AND status = $3 AND expires_at > NOW()
               AND expires_at + make_interval(mins => $2) - created_at
                   <= make_interval(mins => $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Hold>(&query)
            .bind(hold_id)
            .bind(extra_minutes)
            .bind(HoldStatus::Active.as_str())
            .bind(max_lifetime_minutes)
            .fetch_optional(pool)
            .await
    }

    /// ACTIVE -> EXPIRED. Guarded on the current status so lazy expiry and
    /// the sweep stay idempotent. Returns `true` if the row transitioned.
    pub async fn mark_expired(pool: &PgPool, hold_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE booking_holds SET status = $2, updated_at = NOW()
             WHERE id = $1 AND status = $3",
        )
        .bind(hold_id)
        .bind(HoldStatus::Expired.as_str())
        .bind(HoldStatus::Active.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// ACTIVE -> RELEASED. Returns `true` if the row transitioned.
    pub async fn mark_released(pool: &PgPool, hold_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE booking_holds SET status = $2, updated_at = NOW()
             WHERE id = $1 AND status = $3",
        )
        .bind(hold_id)
        .bind(HoldStatus::Released.as_str())
        .bind(HoldStatus::Active.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// ACTIVE -> CONVERTED, stamping the linking appointment. Returns the
    /// updated row, or `None` if the hold was not ACTIVE.
    pub async fn mark_converted(
        pool: &PgPool,
        hold_id: DbId,
        appointment_id: DbId,
    ) -> Result<Option<Hold>, sqlx::Error> {
        let query = format!(
            "UPDATE booking_holds
             SET status = $2, appointment_id = $3, converted_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND status = $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Hold>(&query)
            .bind(hold_id)
            .bind(HoldStatus::Converted.as_str())
            .bind(appointment_id)
            .bind(HoldStatus::Active.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Batch sweep: expire every ACTIVE hold whose TTL has passed. Returns
    /// the count of rows transitioned; repeated runs are no-ops.
    pub async fn expire_overdue(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE booking_holds SET status = $1, updated_at = NOW()
             WHERE status = $2 AND expires_at < NOW()",
        )
        .bind(HoldStatus::Expired.as_str())
        .bind(HoldStatus::Active.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
