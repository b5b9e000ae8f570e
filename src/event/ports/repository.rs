//! Repository port for event records and auto-check rules.

use crate::event::domain::{AutoCheckRule, EventId, EventKind, EventRecord};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for event repository operations.
pub type EventRepositoryResult<T> = Result<T, EventRepositoryError>;

/// Event persistence contract.
///
/// Records are never deleted; only their acknowledgement state changes.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Appends a new record.
    ///
    /// # Errors
    ///
    /// Returns [`EventRepositoryError::Duplicate`] when a record with the
    /// same identifier already exists; the stored record is kept.
    async fn append(&self, record: &EventRecord) -> EventRepositoryResult<()>;

    /// Finds a record by identifier.
    async fn find(&self, id: EventId) -> EventRepositoryResult<Option<EventRecord>>;

    /// Replaces every record in `records` in one atomic write.
    ///
    /// # Errors
    ///
    /// Returns [`EventRepositoryError::NotFound`] when any record is
    /// unknown; nothing is written in that case.
    async fn update_all(&self, records: &[EventRecord]) -> EventRepositoryResult<()>;

    /// Returns every record of `kind`, oldest first.
    async fn list(&self, kind: EventKind) -> EventRepositoryResult<Vec<EventRecord>>;

    /// Stores an auto-check rule.
    async fn save_rule(&self, rule: &AutoCheckRule) -> EventRepositoryResult<()>;

    /// Returns every auto-check rule in creation order.
    async fn list_rules(&self) -> EventRepositoryResult<Vec<AutoCheckRule>>;
}

/// Errors returned by event repository implementations.
#[derive(Debug, Clone, Error)]
pub enum EventRepositoryError {
    /// The record does not exist.
    #[error("event not found: {0}")]
    NotFound(EventId),
    /// A record with this identifier already exists.
    #[error("event already recorded: {0}")]
    Duplicate(EventId),
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl EventRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
