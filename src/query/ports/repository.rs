//! Repository port for saved queries.

use crate::query::domain::{SavedQuery, SavedQueryId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for saved query repository operations.
pub type SavedQueryRepositoryResult<T> = Result<T, SavedQueryRepositoryError>;

/// Saved query persistence contract.
#[async_trait]
pub trait SavedQueryRepository: Send + Sync {
    /// Inserts or replaces a saved query.
    ///
    /// # Errors
    ///
    /// Returns [`SavedQueryRepositoryError::DuplicateName`] when another
    /// query already uses the name.
    async fn save(&self, query: &SavedQuery) -> SavedQueryRepositoryResult<()>;

    /// Finds a saved query by identifier.
    async fn find(&self, id: SavedQueryId) -> SavedQueryRepositoryResult<Option<SavedQuery>>;

    /// Returns every saved query, ordered by name.
    async fn list(&self) -> SavedQueryRepositoryResult<Vec<SavedQuery>>;
}

/// Errors returned by saved query repository implementations.
#[derive(Debug, Clone, Error)]
pub enum SavedQueryRepositoryError {
    /// Another query already uses the name.
    #[error("duplicate query name: {0}")]
    DuplicateName(String),
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl SavedQueryRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
