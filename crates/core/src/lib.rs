//! Pure domain logic for the Lumea booking engine.
//!
//! This crate has zero internal deps and performs no I/O, so it can be used
//! by the repository layer, the API, and any future worker or CLI tooling.

pub mod availability;
pub mod error;
pub mod hold;
pub mod timegrid;
pub mod types;
