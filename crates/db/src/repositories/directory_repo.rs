//! Lookups against the directory tables (salons, professionals, services,
//! clients). The booking engine only needs existence/active checks and the
//! phone-based client lookup; directory CRUD lives elsewhere in the
//! platform, so only the inserts needed by admin tooling and fixtures exist.

use lumea_core::types::DbId;
use sqlx::PgPool;

use crate::models::directory::{Client, CreateService, Professional, Salon, Service};

/// Directory reads used by hold-creation gating.
pub struct DirectoryRepo;

impl DirectoryRepo {
    pub async fn find_salon(pool: &PgPool, salon_id: DbId) -> Result<Option<Salon>, sqlx::Error> {
        sqlx::query_as::<_, Salon>(
            "SELECT id, name, created_at, updated_at FROM salons WHERE id = $1",
        )
        .bind(salon_id)
        .fetch_optional(pool)
        .await
    }

    /// A professional belonging to the salon, regardless of active flag;
    /// callers decide how to treat inactive rows.
    pub async fn find_professional(
        pool: &PgPool,
        salon_id: DbId,
        professional_id: DbId,
    ) -> Result<Option<Professional>, sqlx::Error> {
        sqlx::query_as::<_, Professional>(
            "SELECT id, salon_id, name, is_active, created_at, updated_at
             FROM professionals WHERE id = $1 AND salon_id = $2",
        )
        .bind(professional_id)
        .bind(salon_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_service(
        pool: &PgPool,
        salon_id: DbId,
        service_id: DbId,
    ) -> Result<Option<Service>, sqlx::Error> {
        sqlx::query_as::<_, Service>(
            "SELECT id, salon_id, name, duration_minutes, is_active, allow_online_booking,
                    created_at, updated_at
             FROM services WHERE id = $1 AND salon_id = $2",
        )
        .bind(service_id)
        .bind(salon_id)
        .fetch_optional(pool)
        .await
    }

    /// Convenience linking: resolve an existing client by phone. Absence is
    /// not an error; holds simply carry no client_id.
    pub async fn find_client_by_phone(
        pool: &PgPool,
        salon_id: DbId,
        phone: &str,
    ) -> Result<Option<Client>, sqlx::Error> {
        sqlx::query_as::<_, Client>(
            "SELECT id, salon_id, name, phone, created_at, updated_at
             FROM clients WHERE salon_id = $1 AND phone = $2",
        )
        .bind(salon_id)
        .bind(phone)
        .fetch_optional(pool)
        .await
    }

    pub async fn create_salon(pool: &PgPool, name: &str) -> Result<Salon, sqlx::Error> {
        sqlx::query_as::<_, Salon>(
            "INSERT INTO salons (name) VALUES ($1)
             RETURNING id, name, created_at, updated_at",
        )
        .bind(name)
        .fetch_one(pool)
        .await
    }

    pub async fn create_professional(
        pool: &PgPool,
        salon_id: DbId,
        name: &str,
        is_active: bool,
    ) -> Result<Professional, sqlx::Error> {
        sqlx::query_as::<_, Professional>(
            "INSERT INTO professionals (salon_id, name, is_active) VALUES ($1, $2, $3)
             RETURNING id, salon_id, name, is_active, created_at, updated_at",
        )
        .bind(salon_id)
        .bind(name)
        .bind(is_active)
        .fetch_one(pool)
        .await
    }

    pub async fn create_service(
        pool: &PgPool,
        input: &CreateService,
    ) -> Result<Service, sqlx::Error> {
        sqlx::query_as::<_, Service>(
            "INSERT INTO services (salon_id, name, duration_minutes, is_active, allow_online_booking)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, salon_id, name, duration_minutes, is_active, allow_online_booking,
                       created_at, updated_at",
        )
        .bind(input.salon_id)
        .bind(&input.name)
        .bind(input.duration_minutes)
        .bind(input.is_active.unwrap_or(true))
        .bind(input.allow_online_booking.unwrap_or(true))
        .fetch_one(pool)
        .await
    }

    pub async fn create_client(
        pool: &PgPool,
        salon_id: DbId,
        name: &str,
        phone: &str,
    ) -> Result<Client, sqlx::Error> {
        sqlx::query_as::<_, Client>(
            "INSERT INTO clients (salon_id, name, phone) VALUES ($1, $2, $3)
             RETURNING id, salon_id, name, phone, created_at, updated_at",
        )
        .bind(salon_id)
        .bind(name)
        .bind(phone)
        .fetch_one(pool)
        .await
    }
}
