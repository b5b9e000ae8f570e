//! Cached results of scope resolution.

use super::{DomainId, ScopeId, UserId};
use crate::inventory::domain::{ComputerId, ProjectId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Either the whole fleet or an explicit set of visible items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "items")]
pub enum Visibility<T: Ord> {
    /// No restriction.
    All,
    /// Only the listed items are visible.
    Restricted(BTreeSet<T>),
}

impl<T: Ord> Visibility<T> {
    /// Returns `true` when `item` is visible.
    #[must_use]
    pub fn allows(&self, item: &T) -> bool {
        match self {
            Self::All => true,
            Self::Restricted(items) => items.contains(item),
        }
    }

    /// Returns the explicit restriction, or `None` for the whole fleet.
    #[must_use]
    pub const fn restriction(&self) -> Option<&BTreeSet<T>> {
        match self {
            Self::All => None,
            Self::Restricted(items) => Some(items),
        }
    }

    /// Returns `true` when nothing restricts visibility.
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Returns `true` when every item visible through `other` is also
    /// visible through `self`.
    #[must_use]
    pub fn covers(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::All, _) => true,
            (Self::Restricted(_), Self::All) => false,
            (Self::Restricted(mine), Self::Restricted(theirs)) => theirs.is_subset(mine),
        }
    }
}

impl<T: Ord> Default for Visibility<T> {
    fn default() -> Self {
        Self::Restricted(BTreeSet::new())
    }
}

/// Visibility of one user, stored until the next explicit recomputation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeSnapshot {
    user: UserId,
    computers: Visibility<ComputerId>,
    projects: Visibility<ProjectId>,
    domain: Option<DomainId>,
    scope: Option<ScopeId>,
    computed_at: DateTime<Utc>,
}

impl ScopeSnapshot {
    /// Creates a snapshot.
    #[must_use]
    pub const fn new(
        user: UserId,
        computers: Visibility<ComputerId>,
        projects: Visibility<ProjectId>,
        computed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user,
            computers,
            projects,
            domain: None,
            scope: None,
            computed_at,
        }
    }

    /// Records the preferences the snapshot was computed under.
    #[must_use]
    pub const fn with_preferences(mut self, domain: Option<DomainId>, scope: Option<ScopeId>) -> Self {
        self.domain = domain;
        self.scope = scope;
        self
    }

    /// Returns the user the snapshot belongs to.
    #[must_use]
    pub const fn user(&self) -> UserId {
        self.user
    }

    /// Returns the visible computers.
    #[must_use]
    pub const fn computers(&self) -> &Visibility<ComputerId> {
        &self.computers
    }

    /// Returns the visible projects.
    #[must_use]
    pub const fn projects(&self) -> &Visibility<ProjectId> {
        &self.projects
    }

    /// Returns the domain preference in effect at computation time.
    #[must_use]
    pub const fn domain(&self) -> Option<DomainId> {
        self.domain
    }

    /// Returns the scope preference in effect at computation time.
    #[must_use]
    pub const fn scope(&self) -> Option<ScopeId> {
        self.scope
    }

    /// Returns when the snapshot was computed.
    #[must_use]
    pub const fn computed_at(&self) -> DateTime<Utc> {
        self.computed_at
    }
}
