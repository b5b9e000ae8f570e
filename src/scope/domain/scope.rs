//! User-owned scopes narrowing the visible fleet.

use super::{DomainId, ScopeDomainError, ScopeId, UserId};
use crate::inventory::domain::{AttributeFilter, Computer};
use serde::{Deserialize, Serialize};

/// A named filter owned by one user, optionally bound to a domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    id: ScopeId,
    name: String,
    owner: UserId,
    domain: Option<DomainId>,
    filter: AttributeFilter,
}

impl Scope {
    /// Creates an unbound scope admitting every computer.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeDomainError::EmptyScopeName`] when the name is blank.
    pub fn new(name: impl Into<String>, owner: UserId) -> Result<Self, ScopeDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ScopeDomainError::EmptyScopeName);
        }
        Ok(Self {
            id: ScopeId::new(),
            name: trimmed.to_owned(),
            owner,
            domain: None,
            filter: AttributeFilter::new(),
        })
    }

    /// Binds the scope to a domain.
    #[must_use]
    pub const fn within_domain(mut self, domain: DomainId) -> Self {
        self.domain = Some(domain);
        self
    }

    /// Sets the filter.
    #[must_use]
    pub fn with_filter(mut self, filter: AttributeFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Returns the scope identifier.
    #[must_use]
    pub const fn id(&self) -> ScopeId {
        self.id
    }

    /// Returns the scope name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Returns the bound domain, if any.
    #[must_use]
    pub const fn domain(&self) -> Option<DomainId> {
        self.domain
    }

    /// Returns the filter.
    #[must_use]
    pub const fn filter(&self) -> &AttributeFilter {
        &self.filter
    }

    /// Returns `true` when the scope's filter admits `computer`.
    #[must_use]
    pub fn admits(&self, computer: &Computer) -> bool {
        self.filter.admits(computer)
    }
}
