//! In-memory saved query repository for tests and embedded use.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::query::{
    domain::{SavedQuery, SavedQueryId},
    ports::{SavedQueryRepository, SavedQueryRepositoryError, SavedQueryRepositoryResult},
};

/// Thread-safe in-memory saved query repository.
#[derive(Debug, Clone, Default)]
pub struct InMemorySavedQueryRepository {
    state: Arc<RwLock<HashMap<SavedQueryId, SavedQuery>>>,
}

impl InMemorySavedQueryRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> SavedQueryRepositoryError {
    SavedQueryRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl SavedQueryRepository for InMemorySavedQueryRepository {
    async fn save(&self, query: &SavedQuery) -> SavedQueryRepositoryResult<()> {
        let mut queries = self.state.write().map_err(lock_error)?;
        if queries
            .values()
            .any(|stored| stored.id() != query.id() && stored.name() == query.name())
        {
            return Err(SavedQueryRepositoryError::DuplicateName(query.name().to_owned()));
        }
        queries.insert(query.id(), query.clone());
        Ok(())
    }

    async fn find(&self, id: SavedQueryId) -> SavedQueryRepositoryResult<Option<SavedQuery>> {
        let queries = self.state.read().map_err(lock_error)?;
        Ok(queries.get(&id).cloned())
    }

    async fn list(&self) -> SavedQueryRepositoryResult<Vec<SavedQuery>> {
        let queries = self.state.read().map_err(lock_error)?;
        let mut listed: Vec<SavedQuery> = queries.values().cloned().collect();
        listed.sort_by(|left, right| left.name().cmp(right.name()));
        Ok(listed)
    }
}
