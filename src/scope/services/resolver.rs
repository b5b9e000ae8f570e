//! Snapshot maintenance and preference handling.

use crate::inventory::{
    domain::{Computer, ComputerId},
    ports::{InventoryRepository, InventoryRepositoryError},
};
use crate::scope::{
    domain::{
        Domain, DomainId, Scope, ScopeId, ScopeSnapshot, UserId, UserProfile, Visibility,
        resolve_visibility,
    },
    ports::{ScopeRepository, ScopeRepositoryError},
};
use crate::validation::{ValidationError, ValidationErrors};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Service-level errors for scope operations.
#[derive(Debug, Error)]
pub enum ScopeServiceError {
    /// Input validation failed; nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    /// Scope repository operation failed.
    #[error(transparent)]
    Repository(#[from] ScopeRepositoryError),
    /// Inventory repository operation failed.
    #[error(transparent)]
    Inventory(#[from] InventoryRepositoryError),
    /// The user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),
    /// The domain does not exist.
    #[error("domain not found: {0}")]
    DomainNotFound(DomainId),
    /// The computer does not exist.
    #[error("computer not found: {0}")]
    ComputerNotFound(ComputerId),
}

/// Result type for scope service operations.
pub type ScopeServiceResult<T> = Result<T, ScopeServiceError>;

/// Scope resolution service.
///
/// Snapshots are never refreshed implicitly: callers that edit domains,
/// scopes, or inventory membership decide when to recompute.
#[derive(Clone)]
pub struct ScopeService<S, I, C>
where
    S: ScopeRepository,
    I: InventoryRepository,
    C: Clock + Send + Sync,
{
    scopes: Arc<S>,
    inventory: Arc<I>,
    clock: Arc<C>,
}

impl<S, I, C> ScopeService<S, I, C>
where
    S: ScopeRepository,
    I: InventoryRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new scope service.
    #[must_use]
    pub const fn new(scopes: Arc<S>, inventory: Arc<I>, clock: Arc<C>) -> Self {
        Self {
            scopes,
            inventory,
            clock,
        }
    }

    /// Inserts or replaces a user profile without touching its snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeServiceError::Repository`] on persistence failures.
    pub async fn save_user(&self, user: UserProfile) -> ScopeServiceResult<UserProfile> {
        self.scopes.save_user(&user).await?;
        Ok(user)
    }

    /// Recomputes and stores the snapshot of `user`.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeServiceError::UserNotFound`] for an unknown user.
    pub async fn update_scope(&self, user: UserId) -> ScopeServiceResult<ScopeSnapshot> {
        let profile = self.load_user(user).await?;
        let domains = self.scopes.list_domains().await?;
        let owned = self.scopes.list_scopes_for_user(user).await?;
        let computers = self.inventory.list_computers(None).await?;

        let (visible_computers, visible_projects) =
            resolve_visibility(&profile, &domains, &owned, &computers);
        let snapshot = ScopeSnapshot::new(user, visible_computers, visible_projects, self.clock.utc())
            .with_preferences(profile.domain_preference(), profile.scope_preference());
        self.scopes.save_snapshot(&snapshot).await?;

        info!(
            user_id = %user,
            view_all = snapshot.computers().is_all(),
            computers = snapshot.computers().restriction().map_or(0, |ids| ids.len()),
            "updated scope snapshot"
        );
        Ok(snapshot)
    }

    /// Returns the stored snapshot, computing it once if it was never
    /// computed.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeServiceError::UserNotFound`] for an unknown user.
    pub async fn snapshot(&self, user: UserId) -> ScopeServiceResult<ScopeSnapshot> {
        if let Some(stored) = self.scopes.find_snapshot(user).await? {
            return Ok(stored);
        }
        debug!(user_id = %user, "no stored snapshot, computing");
        self.update_scope(user).await
    }

    /// Returns the computers visible to `user` according to the stored
    /// snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeServiceError::UserNotFound`] for an unknown user.
    pub async fn visible_computers(&self, user: UserId) -> ScopeServiceResult<Visibility<ComputerId>> {
        let snapshot = self.snapshot(user).await?;
        Ok(snapshot.computers().clone())
    }

    /// Validates and stores the user's domain and scope preferences, then
    /// recomputes the snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeServiceError::Validation`] when the domain is unknown
    /// or not assigned to the user, or the scope is not owned by the user.
    pub async fn set_preferences(
        &self,
        user: UserId,
        domain: Option<DomainId>,
        scope: Option<ScopeId>,
    ) -> ScopeServiceResult<ScopeSnapshot> {
        let mut profile = self.load_user(user).await?;
        let mut errors = Vec::new();
        if let Some(preferred) = domain {
            if self.scopes.find_domain(preferred).await?.is_none() {
                errors.push(ValidationError::UnknownDomain(preferred));
            } else if !profile.is_assigned(preferred) {
                errors.push(ValidationError::DomainNotAssigned(preferred));
            }
        }
        if let Some(preferred) = scope {
            let owned = self
                .scopes
                .find_scope(preferred)
                .await?
                .is_some_and(|found| found.owner() == user);
            if !owned {
                errors.push(ValidationError::ScopeNotOwned(preferred));
            }
        }
        ValidationErrors::check(errors)?;

        profile.set_preferences(domain, scope);
        self.scopes.save_user(&profile).await?;
        info!(user_id = %user, ?domain, ?scope, "changed scope preferences");
        self.update_scope(user).await
    }

    /// Inserts or replaces a domain.
    ///
    /// Stored snapshots are left untouched; call
    /// [`ScopeService::refresh_domain_members`] to propagate the change.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeServiceError::Repository`] on persistence failures.
    pub async fn save_domain(&self, domain: Domain) -> ScopeServiceResult<Domain> {
        self.scopes.save_domain(&domain).await?;
        info!(domain_id = %domain.id(), name = domain.name(), "saved domain");
        Ok(domain)
    }

    /// Recomputes the snapshot of every user assigned to `domain`.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeServiceError::Repository`] on persistence failures.
    pub async fn refresh_domain_members(&self, domain: DomainId) -> ScopeServiceResult<Vec<ScopeSnapshot>> {
        let members = self.scopes.list_users_in_domain(domain).await?;
        let mut snapshots = Vec::with_capacity(members.len());
        for member in members {
            snapshots.push(self.update_scope(member.id()).await?);
        }
        Ok(snapshots)
    }

    /// Inserts or replaces a scope.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeServiceError::Validation`] when the scope is bound to
    /// an unknown domain.
    pub async fn save_scope(&self, scope: Scope) -> ScopeServiceResult<Scope> {
        if let Some(bound) = scope.domain()
            && self.scopes.find_domain(bound).await?.is_none()
        {
            return Err(ValidationErrors::single(ValidationError::UnknownDomain(bound)).into());
        }
        self.scopes.save_scope(&scope).await?;
        info!(scope_id = %scope.id(), owner = %scope.owner(), "saved scope");
        Ok(scope)
    }

    /// Returns `true` when `domain` admits `computer`.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeServiceError::DomainNotFound`] or
    /// [`ScopeServiceError::ComputerNotFound`] for unknown identifiers.
    pub async fn domain_admits(&self, domain: DomainId, computer: ComputerId) -> ScopeServiceResult<bool> {
        let found_domain = self
            .scopes
            .find_domain(domain)
            .await?
            .ok_or(ScopeServiceError::DomainNotFound(domain))?;
        let found_computer: Computer = self
            .inventory
            .find_computer(computer)
            .await?
            .ok_or(ScopeServiceError::ComputerNotFound(computer))?;
        Ok(found_domain.admits(&found_computer))
    }

    async fn load_user(&self, id: UserId) -> ScopeServiceResult<UserProfile> {
        self.scopes
            .find_user(id)
            .await?
            .ok_or(ScopeServiceError::UserNotFound(id))
    }
}
