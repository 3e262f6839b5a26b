//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod appointment_repo;
pub mod block_repo;
pub mod directory_repo;
pub mod hold_repo;
pub mod schedule_repo;
pub mod settings_repo;

pub use appointment_repo::AppointmentRepo;
pub use block_repo::BlockRepo;
pub use directory_repo::DirectoryRepo;
pub use hold_repo::HoldRepo;
pub use schedule_repo::ScheduleRepo;
pub use settings_repo::SettingsRepo;
