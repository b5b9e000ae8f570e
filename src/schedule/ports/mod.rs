//! Port contracts for rollout schedules.

pub mod repository;

pub use repository::{ScheduleRepository, ScheduleRepositoryError, ScheduleRepositoryResult};
