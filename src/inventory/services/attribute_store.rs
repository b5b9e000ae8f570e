//! Attribute resolution, computer counts, tagging, and attribute sets.

use crate::inventory::{
    domain::{
        Attribute, AttributeFilter, AttributeId, AttributeSet, Computer, ComputerId,
        ComputerStatus, InventoryDomainError, PropertyPrefix, evaluation_order, find_cycle,
    },
    ports::{InventoryRepository, InventoryRepositoryError},
};
use crate::scope::domain::Visibility;
use crate::validation::{ValidationError, ValidationErrors};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Service-level errors for attribute store operations.
#[derive(Debug, Error)]
pub enum InventoryServiceError {
    /// Domain construction failed.
    #[error(transparent)]
    Domain(#[from] InventoryDomainError),
    /// Input validation failed; nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] InventoryRepositoryError),
    /// The computer does not exist.
    #[error("computer not found: {0}")]
    ComputerNotFound(ComputerId),
}

/// Result type for attribute store operations.
pub type InventoryServiceResult<T> = Result<T, InventoryServiceError>;

/// Attribute store orchestration service.
#[derive(Clone)]
pub struct AttributeStoreService<R>
where
    R: InventoryRepository,
{
    repository: Arc<R>,
}

impl<R> AttributeStoreService<R>
where
    R: InventoryRepository,
{
    /// Creates a new attribute store service.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Returns the underlying repository.
    #[must_use]
    pub fn repository(&self) -> Arc<R> {
        Arc::clone(&self.repository)
    }

    /// Stores a new computer together with its `CID` identity attribute.
    ///
    /// Both are written in one step; a rejected identity leaves no computer
    /// behind.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryServiceError::Repository`] when the computer or
    /// its identity attribute already exists.
    pub async fn register_computer(&self, computer: Computer) -> InventoryServiceResult<Computer> {
        let identity = Attribute::for_computer(computer.id(), computer.name());
        self.repository.store_computer(&computer, &identity).await?;
        info!(computer_id = %computer.id(), name = computer.name(), "registered computer");
        Ok(computer)
    }

    /// Stores a new attribute.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryServiceError::Repository`] when the
    /// `(property, value)` key is already taken.
    pub async fn create_attribute(&self, attribute: Attribute) -> InventoryServiceResult<Attribute> {
        self.repository.store_attribute(&attribute).await?;
        Ok(attribute)
    }

    /// Returns the effective attributes of a computer: sync attributes and
    /// tags.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryServiceError::ComputerNotFound`] for an unknown
    /// computer.
    pub async fn resolve(&self, computer: ComputerId) -> InventoryServiceResult<Vec<Attribute>> {
        let found = self.load_computer(computer).await?;
        Ok(self.repository.find_attributes(&found.attributes()).await?)
    }

    /// Counts visible computers carrying `attribute`.
    ///
    /// Unknown attributes and empty visibility count zero.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryServiceError::Repository`] on persistence
    /// failures.
    pub async fn total_computers(
        &self,
        attribute: AttributeId,
        visibility: &Visibility<ComputerId>,
    ) -> InventoryServiceResult<u64> {
        Ok(self
            .repository
            .count_computers_with_attribute(attribute, visibility.restriction())
            .await?)
    }

    /// Counts visible computers for every attribute under `property`.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryServiceError::Repository`] on persistence
    /// failures.
    pub async fn total_computers_by_attribute(
        &self,
        property: &PropertyPrefix,
        visibility: &Visibility<ComputerId>,
    ) -> InventoryServiceResult<BTreeMap<AttributeId, u64>> {
        Ok(self
            .repository
            .count_computers_by_attribute(property, visibility.restriction())
            .await?)
    }

    /// Returns productive computers reporting `tag` as a sync attribute
    /// without having it assigned.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryServiceError::Repository`] on persistence
    /// failures.
    pub async fn inflicted_computers(&self, tag: AttributeId) -> InventoryServiceResult<Vec<Computer>> {
        let computers = self.repository.list_computers(None).await?;
        Ok(computers
            .into_iter()
            .filter(|computer| {
                computer.status().is_productive()
                    && computer.sync_attributes().contains(&tag)
                    && !computer.tags().contains(&tag)
            })
            .collect())
    }

    /// Replaces the tags of a computer.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryServiceError::Validation`] when a tag is unknown
    /// or not tag-kind, or the computer is `available`, and
    /// [`InventoryServiceError::ComputerNotFound`] for an unknown computer.
    pub async fn assign_tags(
        &self,
        computer: ComputerId,
        tags: BTreeSet<AttributeId>,
    ) -> InventoryServiceResult<Computer> {
        let mut target = self.load_computer(computer).await?;
        let known = self.repository.find_attributes(&tags).await?;
        let mut errors: Vec<ValidationError> = tags
            .iter()
            .filter(|id| !known.iter().any(|attribute| attribute.id() == **id))
            .map(|id| ValidationError::UnknownAttribute(*id))
            .collect();
        errors.extend(
            known
                .iter()
                .filter(|attribute| !attribute.is_tag())
                .map(|attribute| ValidationError::NotATag(attribute.id())),
        );
        let tag_count = tags.len();
        if let Err(err) = target.replace_tags(tags) {
            errors.push(err);
        }
        ValidationErrors::check(errors)?;

        self.repository.update_computer(&target).await?;
        info!(computer_id = %computer, tags = tag_count, "assigned tags");
        Ok(target)
    }

    /// Changes the administrative status of a computer.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryServiceError::Validation`] when a tagged computer
    /// would become `available`.
    pub async fn change_status(
        &self,
        computer: ComputerId,
        status: ComputerStatus,
    ) -> InventoryServiceResult<Computer> {
        let mut target = self.load_computer(computer).await?;
        target
            .change_status(status)
            .map_err(ValidationErrors::from)?;
        self.repository.update_computer(&target).await?;
        info!(computer_id = %computer, status = %status, "changed computer status");
        Ok(target)
    }

    /// Checks that every attribute exists and does not identify an inactive
    /// computer.
    ///
    /// Returns the collected failures; an empty list means the references
    /// are valid.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryServiceError::Repository`] on persistence
    /// failures.
    pub async fn validate_references(
        &self,
        ids: &BTreeSet<AttributeId>,
    ) -> InventoryServiceResult<Vec<ValidationError>> {
        let attributes = self.repository.find_attributes(ids).await?;
        let mut errors: Vec<ValidationError> = ids
            .iter()
            .filter(|id| !attributes.iter().any(|attribute| attribute.id() == **id))
            .map(|id| ValidationError::UnknownAttribute(*id))
            .collect();
        for attribute in &attributes {
            let Some(identified) = attribute.identifies() else {
                continue;
            };
            let active = self
                .repository
                .find_computer(identified)
                .await?
                .is_some_and(|computer| computer.status().is_active());
            if !active {
                errors.push(ValidationError::InactiveComputerAttribute {
                    attribute: attribute.id(),
                    computer: identified,
                });
            }
        }
        Ok(errors)
    }

    /// Creates an attribute set and its representative `SET` attribute.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryServiceError::Validation`] when the filter refers
    /// to unknown or inactive-computer attributes, and
    /// [`InventoryServiceError::Repository`] when the set name is taken.
    pub async fn create_attribute_set(
        &self,
        name: &str,
        filter: &AttributeFilter,
    ) -> InventoryServiceResult<AttributeSet> {
        let representative = Attribute::for_attribute_set(name)?;
        let set = AttributeSet::new(name, &representative)?.with_filter(filter);
        self.validate_attribute_set(&set).await?;
        self.repository
            .store_attribute_set(&set, &representative)
            .await?;
        info!(set_id = %set.id(), name = set.name(), "created attribute set");
        Ok(set)
    }

    /// Saves an edited attribute set.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryServiceError::Validation`] when the set would
    /// depend on itself or refers to unknown or inactive-computer
    /// attributes.
    pub async fn save_attribute_set(&self, set: AttributeSet) -> InventoryServiceResult<AttributeSet> {
        self.validate_attribute_set(&set).await?;
        self.repository.save_attribute_set(&set).await?;
        info!(set_id = %set.id(), name = set.name(), "saved attribute set");
        Ok(set)
    }

    async fn validate_attribute_set(&self, set: &AttributeSet) -> InventoryServiceResult<()> {
        let existing = self.repository.list_attribute_sets().await?;
        let mut errors = Vec::new();
        if let Some(path) = find_cycle(set, &existing) {
            errors.push(ValidationError::CircularAttributeSet {
                name: set.name().to_owned(),
                path,
            });
        }
        let mut references = set.filter().referenced_attributes();
        references.remove(&set.attribute());
        errors.extend(self.validate_references(&references).await?);
        ValidationErrors::check(errors)?;
        Ok(())
    }

    /// Re-evaluates every attribute set for a computer and records the
    /// representative attributes of satisfied sets as sync attributes.
    ///
    /// Sets are evaluated after the sets they refer to, so a set may build
    /// on another set's membership.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryServiceError::Validation`] when stored sets form a
    /// cycle and [`InventoryServiceError::ComputerNotFound`] for an unknown
    /// computer.
    pub async fn refresh_set_attributes(&self, computer: ComputerId) -> InventoryServiceResult<Computer> {
        let mut target = self.load_computer(computer).await?;
        let sets = self.repository.list_attribute_sets().await?;
        let ordered = evaluation_order(&sets).map_err(ValidationErrors::from)?;

        let set_attributes: BTreeSet<AttributeId> =
            sets.iter().map(AttributeSet::attribute).collect();
        let mut current: BTreeSet<AttributeId> = target
            .attributes()
            .difference(&set_attributes)
            .copied()
            .collect();
        let mut joined = BTreeSet::new();
        for set in ordered {
            if set.admits(&current) {
                current.insert(set.attribute());
                joined.insert(set.attribute());
            }
        }
        let left: BTreeSet<AttributeId> = set_attributes.difference(&joined).copied().collect();

        if target.reconcile_sync_attributes(&joined, &left) {
            self.repository.update_computer(&target).await?;
            debug!(computer_id = %computer, sets = joined.len(), "refreshed attribute set membership");
        }
        Ok(target)
    }

    async fn load_computer(&self, id: ComputerId) -> InventoryServiceResult<Computer> {
        self.repository
            .find_computer(id)
            .await?
            .ok_or(InventoryServiceError::ComputerNotFound(id))
    }
}
