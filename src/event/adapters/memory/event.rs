//! In-memory event repository for tests and embedded use.

use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, RwLock};

use crate::event::{
    domain::{AutoCheckRule, EventId, EventKind, EventRecord},
    ports::{EventRepository, EventRepositoryError, EventRepositoryResult},
};

/// Thread-safe in-memory event repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventRepository {
    state: Arc<RwLock<InMemoryEventState>>,
}

#[derive(Debug, Default)]
struct InMemoryEventState {
    records: Vec<EventRecord>,
    positions: HashMap<EventId, usize>,
    rules: Vec<AutoCheckRule>,
}

impl InMemoryEventRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> EventRepositoryError {
    EventRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn append(&self, record: &EventRecord) -> EventRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let position = state.records.len();
        match state.positions.entry(record.id()) {
            Entry::Occupied(_) => return Err(EventRepositoryError::Duplicate(record.id())),
            Entry::Vacant(slot) => {
                slot.insert(position);
            }
        }
        state.records.push(record.clone());
        Ok(())
    }

    async fn find(&self, id: EventId) -> EventRepositoryResult<Option<EventRecord>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .positions
            .get(&id)
            .and_then(|position| state.records.get(*position))
            .cloned())
    }

    async fn update_all(&self, records: &[EventRecord]) -> EventRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let mut positions = Vec::with_capacity(records.len());
        for record in records {
            let position = state
                .positions
                .get(&record.id())
                .copied()
                .ok_or(EventRepositoryError::NotFound(record.id()))?;
            positions.push((position, record));
        }
        for (position, record) in positions {
            if let Some(slot) = state.records.get_mut(position) {
                *slot = record.clone();
            }
        }
        Ok(())
    }

    async fn list(&self, kind: EventKind) -> EventRepositoryResult<Vec<EventRecord>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .records
            .iter()
            .filter(|record| record.kind() == kind)
            .cloned()
            .collect())
    }

    async fn save_rule(&self, rule: &AutoCheckRule) -> EventRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let Some(existing) = state.rules.iter_mut().find(|stored| stored.id() == rule.id()) else {
            state.rules.push(rule.clone());
            return Ok(());
        };
        *existing = rule.clone();
        Ok(())
    }

    async fn list_rules(&self) -> EventRepositoryResult<Vec<AutoCheckRule>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.rules.clone())
    }
}
