//! Repository port for computers, attributes, and attribute sets.

use crate::inventory::domain::{
    Attribute, AttributeId, AttributeSet, Computer, ComputerId, ProjectId, PropertyPrefix,
};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use thiserror::Error;

/// Result type for inventory repository operations.
pub type InventoryRepositoryResult<T> = Result<T, InventoryRepositoryError>;

/// Inventory persistence contract.
///
/// Counting operations accept an optional computer restriction: `None`
/// counts every computer, `Some(set)` only computers in `set`. An empty
/// restriction always counts zero.
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// Stores a new attribute.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryRepositoryError::DuplicateAttribute`] when an
    /// attribute with the same `(property, value)` already exists.
    async fn store_attribute(&self, attribute: &Attribute) -> InventoryRepositoryResult<()>;

    /// Returns the attributes whose identifiers are in `ids`; unknown
    /// identifiers are skipped.
    async fn find_attributes(
        &self,
        ids: &BTreeSet<AttributeId>,
    ) -> InventoryRepositoryResult<Vec<Attribute>>;

    /// Returns every attribute, ordered by property then value.
    async fn list_attributes(&self) -> InventoryRepositoryResult<Vec<Attribute>>;

    /// Stores a new computer, its attribute memberships, and its identity
    /// attribute in one atomic write.
    ///
    /// Nothing is stored when either part is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryRepositoryError::DuplicateComputer`] when the
    /// identifier already exists and
    /// [`InventoryRepositoryError::DuplicateAttribute`] when the identity
    /// key is taken.
    async fn store_computer(
        &self,
        computer: &Computer,
        identity: &Attribute,
    ) -> InventoryRepositoryResult<()>;

    /// Replaces a computer and its attribute memberships atomically.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryRepositoryError::ComputerNotFound`] when the
    /// computer does not exist.
    async fn update_computer(&self, computer: &Computer) -> InventoryRepositoryResult<()>;

    /// Finds a computer by identifier.
    async fn find_computer(&self, id: ComputerId) -> InventoryRepositoryResult<Option<Computer>>;

    /// Returns computers, optionally restricted to one project, ordered by
    /// name.
    async fn list_computers(
        &self,
        project: Option<ProjectId>,
    ) -> InventoryRepositoryResult<Vec<Computer>>;

    /// Counts computers carrying `attribute` as a sync attribute.
    ///
    /// Assigned tags reach the sync attributes at check-in, so a tag that
    /// was never reported back is not counted.
    async fn count_computers_with_attribute(
        &self,
        attribute: AttributeId,
        within: Option<&BTreeSet<ComputerId>>,
    ) -> InventoryRepositoryResult<u64>;

    /// Counts computers per sync attribute for every attribute under
    /// `property`.
    ///
    /// Attributes without computers are reported with zero.
    async fn count_computers_by_attribute(
        &self,
        property: &PropertyPrefix,
        within: Option<&BTreeSet<ComputerId>>,
    ) -> InventoryRepositoryResult<BTreeMap<AttributeId, u64>>;

    /// Stores a new attribute set together with its representative
    /// attribute in one atomic write.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryRepositoryError::DuplicateAttribute`] when the
    /// representative key is taken; the set is not stored then.
    async fn store_attribute_set(
        &self,
        set: &AttributeSet,
        representative: &Attribute,
    ) -> InventoryRepositoryResult<()>;

    /// Inserts or replaces an attribute set.
    async fn save_attribute_set(&self, set: &AttributeSet) -> InventoryRepositoryResult<()>;

    /// Returns every attribute set, ordered by name.
    async fn list_attribute_sets(&self) -> InventoryRepositoryResult<Vec<AttributeSet>>;
}

/// Errors returned by inventory repository implementations.
#[derive(Debug, Clone, Error)]
pub enum InventoryRepositoryError {
    /// An attribute with the same key already exists.
    #[error("duplicate attribute {property}-{value}")]
    DuplicateAttribute {
        /// Property prefix of the rejected attribute.
        property: String,
        /// Value of the rejected attribute.
        value: String,
    },

    /// A computer with the same identifier already exists.
    #[error("duplicate computer identifier: {0}")]
    DuplicateComputer(ComputerId),

    /// The computer was not found.
    #[error("computer not found: {0}")]
    ComputerNotFound(ComputerId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl InventoryRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
