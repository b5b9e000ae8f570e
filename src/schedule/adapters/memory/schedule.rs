//! In-memory schedule repository for tests and embedded use.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::schedule::{
    domain::{Schedule, ScheduleId},
    ports::{ScheduleRepository, ScheduleRepositoryError, ScheduleRepositoryResult},
};

/// Thread-safe in-memory schedule repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryScheduleRepository {
    state: Arc<RwLock<HashMap<ScheduleId, Schedule>>>,
}

impl InMemoryScheduleRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> ScheduleRepositoryError {
    ScheduleRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ScheduleRepository for InMemoryScheduleRepository {
    async fn save(&self, schedule: &Schedule) -> ScheduleRepositoryResult<()> {
        let mut schedules = self.state.write().map_err(lock_error)?;
        if schedules
            .values()
            .any(|stored| stored.id() != schedule.id() && stored.name() == schedule.name())
        {
            return Err(ScheduleRepositoryError::DuplicateName(schedule.name().to_owned()));
        }
        schedules.insert(schedule.id(), schedule.clone());
        Ok(())
    }

    async fn find(&self, id: ScheduleId) -> ScheduleRepositoryResult<Option<Schedule>> {
        let schedules = self.state.read().map_err(lock_error)?;
        Ok(schedules.get(&id).cloned())
    }

    async fn list(&self) -> ScheduleRepositoryResult<Vec<Schedule>> {
        let schedules = self.state.read().map_err(lock_error)?;
        let mut listed: Vec<Schedule> = schedules.values().cloned().collect();
        listed.sort_by(|left, right| left.name().cmp(right.name()));
        Ok(listed)
    }
}
