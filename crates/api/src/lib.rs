//! Lumea booking API server library.
//!
//! Exposes the core building blocks (config, state, error handling, booking
//! services, routes, background jobs) so integration tests and the binary
//! entrypoint can both access them.

pub mod background;
pub mod booking;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
