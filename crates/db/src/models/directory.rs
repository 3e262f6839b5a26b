//! Directory rows consumed by hold-creation gating: salons, services,
//! professionals, and clients. Full CRUD for these lives in the wider
//! platform; this engine only needs existence/active lookups and the phone
//! lookup for convenience linking.

use lumea_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Salon {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Professional {
    pub id: DbId,
    pub salon_id: DbId,
    pub name: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Service {
    pub id: DbId,
    pub salon_id: DbId,
    pub name: String,
    pub duration_minutes: i32,
    pub is_active: bool,
    pub allow_online_booking: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Client {
    pub id: DbId,
    pub salon_id: DbId,
    pub name: String,
    pub phone: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert DTO used by admin tooling and test fixtures.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateService {
    pub salon_id: DbId,
    pub name: String,
    pub duration_minutes: i32,
    pub is_active: Option<bool>,
    pub allow_online_booking: Option<bool>,
}
