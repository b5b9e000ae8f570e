//! Repository port for rollout schedules.

use crate::schedule::domain::{Schedule, ScheduleId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for schedule repository operations.
pub type ScheduleRepositoryResult<T> = Result<T, ScheduleRepositoryError>;

/// Schedule persistence contract.
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// Inserts or replaces a schedule with all of its tiers.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleRepositoryError::DuplicateName`] when another
    /// schedule already uses the name.
    async fn save(&self, schedule: &Schedule) -> ScheduleRepositoryResult<()>;

    /// Finds a schedule by identifier.
    async fn find(&self, id: ScheduleId) -> ScheduleRepositoryResult<Option<Schedule>>;

    /// Returns every schedule, ordered by name.
    async fn list(&self) -> ScheduleRepositoryResult<Vec<Schedule>>;
}

/// Errors returned by schedule repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ScheduleRepositoryError {
    /// Another schedule already uses the name.
    #[error("duplicate schedule name: {0}")]
    DuplicateName(String),
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ScheduleRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
