//! Repository for the `appointments` table.

use chrono::NaiveDate;
use lumea_core::types::DbId;
use sqlx::PgPool;

use crate::models::appointment::{occupying_status_list, Appointment, CreateAppointment};

const COLUMNS: &str = "id, salon_id, professional_id, client_name, client_phone, date, \
                       start_time, end_time, status, created_at, updated_at";

/// Confirmed bookings. This engine mostly reads; inserts serve hold
/// conversion callers and test fixtures.
pub struct AppointmentRepo;

impl AppointmentRepo {
    /// Insert an appointment, defaulting to SCHEDULED.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAppointment,
    ) -> Result<Appointment, sqlx::Error> {
        let query = format!(
            "INSERT INTO appointments
                 (salon_id, professional_id, client_name, client_phone, date, start_time, end_time, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(input.salon_id)
            .bind(input.professional_id)
            .bind(&input.client_name)
            .bind(&input.client_phone)
            .bind(input.date)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(input.status.as_deref().unwrap_or("SCHEDULED"))
            .fetch_one(pool)
            .await
    }

    /// Appointments that occupy slots on (professional, date), per
    /// [`crate::models::appointment::OCCUPYING_STATUSES`]. Cancelled and
    /// no-show rows never block.
    pub async fn occupying_for_day(
        pool: &PgPool,
        professional_id: DbId,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM appointments
             WHERE professional_id = $1
               AND date = $2
               AND status IN ({})
             ORDER BY start_time",
            occupying_status_list()
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(professional_id)
            .bind(date)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Appointment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM appointments WHERE id = $1");
        sqlx::query_as::<_, Appointment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
