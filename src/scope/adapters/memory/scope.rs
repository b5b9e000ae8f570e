//! In-memory scope repository for tests and embedded use.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::scope::{
    domain::{Domain, DomainId, Scope, ScopeId, ScopeSnapshot, UserId, UserProfile},
    ports::{ScopeRepository, ScopeRepositoryError, ScopeRepositoryResult},
};

/// Thread-safe in-memory scope repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryScopeRepository {
    state: Arc<RwLock<InMemoryScopeState>>,
}

#[derive(Debug, Default)]
struct InMemoryScopeState {
    users: HashMap<UserId, UserProfile>,
    domains: HashMap<DomainId, Domain>,
    scopes: HashMap<ScopeId, Scope>,
    snapshots: HashMap<UserId, ScopeSnapshot>,
}

impl InMemoryScopeRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> ScopeRepositoryError {
    ScopeRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ScopeRepository for InMemoryScopeRepository {
    async fn save_user(&self, user: &UserProfile) -> ScopeRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_user(&self, id: UserId) -> ScopeRepositoryResult<Option<UserProfile>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.users.get(&id).cloned())
    }

    async fn list_users_in_domain(&self, domain: DomainId) -> ScopeRepositoryResult<Vec<UserProfile>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut users: Vec<UserProfile> = state
            .users
            .values()
            .filter(|user| user.is_assigned(domain))
            .cloned()
            .collect();
        users.sort_by(|left, right| left.username().cmp(right.username()));
        Ok(users)
    }

    async fn save_domain(&self, domain: &Domain) -> ScopeRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.domains.insert(domain.id(), domain.clone());
        Ok(())
    }

    async fn find_domain(&self, id: DomainId) -> ScopeRepositoryResult<Option<Domain>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.domains.get(&id).cloned())
    }

    async fn list_domains(&self) -> ScopeRepositoryResult<Vec<Domain>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut domains: Vec<Domain> = state.domains.values().cloned().collect();
        domains.sort_by(|left, right| left.name().cmp(right.name()));
        Ok(domains)
    }

    async fn save_scope(&self, scope: &Scope) -> ScopeRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.scopes.insert(scope.id(), scope.clone());
        Ok(())
    }

    async fn find_scope(&self, id: ScopeId) -> ScopeRepositoryResult<Option<Scope>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.scopes.get(&id).cloned())
    }

    async fn list_scopes_for_user(&self, owner: UserId) -> ScopeRepositoryResult<Vec<Scope>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut scopes: Vec<Scope> = state
            .scopes
            .values()
            .filter(|scope| scope.owner() == owner)
            .cloned()
            .collect();
        scopes.sort_by(|left, right| left.name().cmp(right.name()));
        Ok(scopes)
    }

    async fn save_snapshot(&self, snapshot: &ScopeSnapshot) -> ScopeRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.snapshots.insert(snapshot.user(), snapshot.clone());
        Ok(())
    }

    async fn find_snapshot(&self, user: UserId) -> ScopeRepositoryResult<Option<ScopeSnapshot>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.snapshots.get(&user).cloned())
    }
}
