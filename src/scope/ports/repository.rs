//! Repository port for users, domains, scopes, and snapshots.

use crate::scope::domain::{Domain, DomainId, Scope, ScopeId, ScopeSnapshot, UserId, UserProfile};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for scope repository operations.
pub type ScopeRepositoryResult<T> = Result<T, ScopeRepositoryError>;

/// Scope persistence contract.
#[async_trait]
pub trait ScopeRepository: Send + Sync {
    /// Inserts or replaces a user profile.
    async fn save_user(&self, user: &UserProfile) -> ScopeRepositoryResult<()>;

    /// Finds a user profile by identifier.
    async fn find_user(&self, id: UserId) -> ScopeRepositoryResult<Option<UserProfile>>;

    /// Returns users with `domain` among their assigned domains.
    async fn list_users_in_domain(&self, domain: DomainId) -> ScopeRepositoryResult<Vec<UserProfile>>;

    /// Inserts or replaces a domain.
    async fn save_domain(&self, domain: &Domain) -> ScopeRepositoryResult<()>;

    /// Finds a domain by identifier.
    async fn find_domain(&self, id: DomainId) -> ScopeRepositoryResult<Option<Domain>>;

    /// Returns every domain, ordered by name.
    async fn list_domains(&self) -> ScopeRepositoryResult<Vec<Domain>>;

    /// Inserts or replaces a scope.
    async fn save_scope(&self, scope: &Scope) -> ScopeRepositoryResult<()>;

    /// Finds a scope by identifier.
    async fn find_scope(&self, id: ScopeId) -> ScopeRepositoryResult<Option<Scope>>;

    /// Returns the scopes owned by `owner`, ordered by name.
    async fn list_scopes_for_user(&self, owner: UserId) -> ScopeRepositoryResult<Vec<Scope>>;

    /// Inserts or replaces the snapshot of the snapshot's user.
    async fn save_snapshot(&self, snapshot: &ScopeSnapshot) -> ScopeRepositoryResult<()>;

    /// Finds the stored snapshot of a user.
    async fn find_snapshot(&self, user: UserId) -> ScopeRepositoryResult<Option<ScopeSnapshot>>;
}

/// Errors returned by scope repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ScopeRepositoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ScopeRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
