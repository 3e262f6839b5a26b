//! HTTP handlers. Thin wrappers around the booking services and repos.

pub mod availability;
pub mod holds;
pub mod schedules;
pub mod settings;
