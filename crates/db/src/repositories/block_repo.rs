//! Repository for the `professional_blocks` table.

use chrono::NaiveDate;
use lumea_core::types::DbId;
use sqlx::PgPool;

use crate::models::block::{CreateProfessionalBlock, ProfessionalBlock, BLOCK_STATUS_APPROVED};

const COLUMNS: &str = "id, professional_id, start_date, end_date, start_time, end_time, \
                       status, title, created_at, updated_at";

/// Ad-hoc professional unavailability windows.
pub struct BlockRepo;

impl BlockRepo {
    /// Insert a block. Status defaults to APPROVED (staff-created blocks
    /// are enforced immediately).
    pub async fn create(
        pool: &PgPool,
        professional_id: DbId,
        input: &CreateProfessionalBlock,
    ) -> Result<ProfessionalBlock, sqlx::Error> {
        let query = format!(
            "INSERT INTO professional_blocks
                 (professional_id, start_date, end_date, start_time, end_time, status, title)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProfessionalBlock>(&query)
            .bind(professional_id)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(input.status.as_deref().unwrap_or(BLOCK_STATUS_APPROVED))
            .bind(input.title.as_deref().unwrap_or(""))
            .fetch_one(pool)
            .await
    }

    /// Approved blocks covering the given calendar date.
    pub async fn approved_for_date(
        pool: &PgPool,
        professional_id: DbId,
        date: NaiveDate,
    ) -> Result<Vec<ProfessionalBlock>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM professional_blocks
             WHERE professional_id = $1
               AND status = $2
               AND start_date <= $3
               AND end_date >= $3
             ORDER BY start_time NULLS FIRST"
        );
        sqlx::query_as::<_, ProfessionalBlock>(&query)
            .bind(professional_id)
            .bind(BLOCK_STATUS_APPROVED)
            .bind(date)
            .fetch_all(pool)
            .await
    }

    /// All blocks for a professional, newest first.
    pub async fn list_for_professional(
        pool: &PgPool,
        professional_id: DbId,
    ) -> Result<Vec<ProfessionalBlock>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM professional_blocks
             WHERE professional_id = $1
             ORDER BY start_date DESC, id DESC"
        );
        sqlx::query_as::<_, ProfessionalBlock>(&query)
            .bind(professional_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a block. Returns `true` if a row was removed.
    pub async fn delete(
        pool: &PgPool,
        professional_id: DbId,
        block_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM professional_blocks WHERE id = $1 AND professional_id = $2")
                .bind(block_id)
                .bind(professional_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
