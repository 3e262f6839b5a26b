//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for the write operations that exist for the table

pub mod appointment;
pub mod block;
pub mod directory;
pub mod hold;
pub mod schedule;
pub mod settings;
