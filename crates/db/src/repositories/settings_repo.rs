//! Repository for the `booking_settings` table.

use lumea_core::types::DbId;
use sqlx::PgPool;

use crate::models::settings::{BookingSettings, UpdateBookingSettings};

const COLUMNS: &str = "id, salon_id, online_booking_enabled, hold_duration_minutes, \
                       slot_granularity_minutes, created_at, updated_at";

/// Per-salon online-booking settings, lazily seeded with defaults.
pub struct SettingsRepo;

impl SettingsRepo {
    /// Fetch a salon's settings, inserting the default row on first access.
    pub async fn get_or_create(
        pool: &PgPool,
        salon_id: DbId,
    ) -> Result<BookingSettings, sqlx::Error> {
        sqlx::query(
            "INSERT INTO booking_settings (salon_id)
             VALUES ($1)
             ON CONFLICT (salon_id) DO NOTHING",
        )
        .bind(salon_id)
        .execute(pool)
        .await?;

        let query = format!("SELECT {COLUMNS} FROM booking_settings WHERE salon_id = $1");
        sqlx::query_as::<_, BookingSettings>(&query)
            .bind(salon_id)
            .fetch_one(pool)
            .await
    }

    /// Patch a salon's settings; absent fields are left unchanged.
    pub async fn update(
        pool: &PgPool,
        salon_id: DbId,
        input: &UpdateBookingSettings,
    ) -> Result<BookingSettings, sqlx::Error> {
        // Seed first so a PATCH on a fresh salon behaves like read-then-write.
        Self::get_or_create(pool, salon_id).await?;

        let query = format!(
            "UPDATE booking_settings
             SET online_booking_enabled = COALESCE($2, online_booking_enabled),
                 hold_duration_minutes = COALESCE($3, hold_duration_minutes),
                 slot_granularity_minutes = COALESCE($4, slot_granularity_minutes),
                 updated_at = NOW()
             WHERE salon_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BookingSettings>(&query)
            .bind(salon_id)
            .bind(input.online_booking_enabled)
            .bind(input.hold_duration_minutes)
            .bind(input.slot_granularity_minutes)
            .fetch_one(pool)
            .await
    }
}
