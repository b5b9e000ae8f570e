//! Domains: administrative partitions of the fleet.

use super::{DomainId, ScopeDomainError};
use crate::inventory::domain::{AttributeFilter, AttributeId, Computer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A named partition of the fleet delegated to a group of administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    id: DomainId,
    name: String,
    comment: Option<String>,
    filter: AttributeFilter,
    tags: BTreeSet<AttributeId>,
}

impl Domain {
    /// Creates a domain admitting every computer.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeDomainError::InvalidDomainName`] when the name is
    /// empty or contains whitespace; the name becomes a deployment name
    /// prefix.
    pub fn new(name: impl Into<String>) -> Result<Self, ScopeDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return Err(ScopeDomainError::InvalidDomainName(raw));
        }
        Ok(Self {
            id: DomainId::new(),
            name: trimmed.to_owned(),
            comment: None,
            filter: AttributeFilter::new(),
            tags: BTreeSet::new(),
        })
    }

    /// Sets the filter selecting the domain's computers.
    #[must_use]
    pub fn with_filter(mut self, filter: AttributeFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Sets the tags administrators of the domain may assign.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = AttributeId>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    /// Sets the comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Returns the domain identifier.
    #[must_use]
    pub const fn id(&self) -> DomainId {
        self.id
    }

    /// Returns the domain name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the comment, if any.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Returns the filter selecting the domain's computers.
    #[must_use]
    pub const fn filter(&self) -> &AttributeFilter {
        &self.filter
    }

    /// Returns the assignable tags.
    #[must_use]
    pub const fn tags(&self) -> &BTreeSet<AttributeId> {
        &self.tags
    }

    /// Returns the prefix given to names of deployments bound to the
    /// domain.
    #[must_use]
    pub fn deployment_prefix(&self) -> String {
        self.name.to_lowercase()
    }

    /// Returns `true` when the domain's filter admits `computer`.
    #[must_use]
    pub fn admits(&self, computer: &Computer) -> bool {
        self.filter.admits(computer)
    }
}
