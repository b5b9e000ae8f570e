//! Administrator profiles as resolved by the authentication boundary.

use super::{DomainId, ScopeDomainError, ScopeId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An administrator together with assigned domains and preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    id: UserId,
    username: String,
    view_all: bool,
    domains: BTreeSet<DomainId>,
    domain_preference: Option<DomainId>,
    scope_preference: Option<ScopeId>,
}

impl UserProfile {
    /// Creates an unprivileged user without domains or preferences.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeDomainError::EmptyUsername`] when the username is
    /// blank.
    pub fn new(username: impl Into<String>) -> Result<Self, ScopeDomainError> {
        let raw = username.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ScopeDomainError::EmptyUsername);
        }
        Ok(Self {
            id: UserId::new(),
            username: trimmed.to_owned(),
            view_all: false,
            domains: BTreeSet::new(),
            domain_preference: None,
            scope_preference: None,
        })
    }

    /// Grants or revokes the "view all" privilege.
    #[must_use]
    pub const fn with_view_all(mut self, view_all: bool) -> Self {
        self.view_all = view_all;
        self
    }

    /// Sets the assigned domains.
    #[must_use]
    pub fn with_domains(mut self, domains: impl IntoIterator<Item = DomainId>) -> Self {
        self.domains = domains.into_iter().collect();
        self
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns `true` when the user holds the "view all" privilege.
    #[must_use]
    pub const fn has_view_all_privilege(&self) -> bool {
        self.view_all
    }

    /// Returns the assigned domains.
    #[must_use]
    pub const fn domains(&self) -> &BTreeSet<DomainId> {
        &self.domains
    }

    /// Returns the preferred domain, if any.
    #[must_use]
    pub const fn domain_preference(&self) -> Option<DomainId> {
        self.domain_preference
    }

    /// Returns the preferred scope, if any.
    #[must_use]
    pub const fn scope_preference(&self) -> Option<ScopeId> {
        self.scope_preference
    }

    /// Returns `true` when the user sees the whole fleet: privileged and
    /// not narrowed by any preference.
    #[must_use]
    pub const fn is_view_all(&self) -> bool {
        self.view_all && self.domain_preference.is_none() && self.scope_preference.is_none()
    }

    /// Returns `true` when `domain` is assigned to the user.
    #[must_use]
    pub fn is_assigned(&self, domain: DomainId) -> bool {
        self.domains.contains(&domain)
    }

    /// Replaces both preferences without validation.
    pub const fn set_preferences(&mut self, domain: Option<DomainId>, scope: Option<ScopeId>) {
        self.domain_preference = domain;
        self.scope_preference = scope;
    }
}
