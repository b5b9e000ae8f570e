//! Saved queries.

use super::{QueryDefinition, QueryDomainError, SavedQueryId};
use serde::{Deserialize, Serialize};

/// A named, reusable query definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedQuery {
    id: SavedQueryId,
    name: String,
    description: Option<String>,
    definition: QueryDefinition,
}

impl SavedQuery {
    /// Creates a saved query after validating its definition.
    ///
    /// # Errors
    ///
    /// Returns [`QueryDomainError::EmptyQueryName`] for a blank name, or the
    /// definition's validation error.
    pub fn new(name: impl Into<String>, definition: QueryDefinition) -> Result<Self, QueryDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(QueryDomainError::EmptyQueryName);
        }
        definition.validate()?;
        Ok(Self {
            id: SavedQueryId::new(),
            name: trimmed.to_owned(),
            description: None,
            definition,
        })
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the query identifier.
    #[must_use]
    pub const fn id(&self) -> SavedQueryId {
        self.id
    }

    /// Returns the query name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the definition.
    #[must_use]
    pub const fn definition(&self) -> &QueryDefinition {
        &self.definition
    }
}
