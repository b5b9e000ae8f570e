//! Port contracts for event records.

pub mod repository;

pub use repository::{EventRepository, EventRepositoryError, EventRepositoryResult};
