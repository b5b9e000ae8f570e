//! Managed computers and their attribute memberships.

use super::{AttributeId, ComputerId, InventoryDomainError, ParseComputerStatusError, ProjectId};
use crate::validation::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Administrative status of a computer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComputerStatus {
    /// Registered but not yet confirmed.
    Pending,
    /// In production, assigned to its intended use.
    Intended,
    /// In production, reserved for a specific use.
    Reserved,
    /// In production with an unknown use.
    Unknown,
    /// Spare computer, ready to be assigned.
    Available,
    /// Temporarily out of service for repair.
    InRepair,
    /// Permanently withdrawn from the fleet.
    Unsubscribed,
}

impl ComputerStatus {
    /// All statuses in display order.
    pub const ALL: [Self; 7] = [
        Self::Pending,
        Self::Intended,
        Self::Reserved,
        Self::Unknown,
        Self::Available,
        Self::InRepair,
        Self::Unsubscribed,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Intended => "intended",
            Self::Reserved => "reserved",
            Self::Unknown => "unknown",
            Self::Available => "available",
            Self::InRepair => "in_repair",
            Self::Unsubscribed => "unsubscribed",
        }
    }

    /// Returns `true` for statuses of computers in production use.
    #[must_use]
    pub const fn is_productive(self) -> bool {
        matches!(self, Self::Intended | Self::Reserved | Self::Unknown)
    }

    /// Returns `true` for statuses of computers still part of the fleet.
    #[must_use]
    pub const fn is_active(self) -> bool {
        self.is_productive() || matches!(self, Self::Available | Self::InRepair)
    }
}

impl fmt::Display for ComputerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ComputerStatus {
    type Error = ParseComputerStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ParseComputerStatusError(value.to_owned()))
    }
}

/// A managed computer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Computer {
    id: ComputerId,
    name: String,
    project: ProjectId,
    status: ComputerStatus,
    sync_attributes: BTreeSet<AttributeId>,
    tags: BTreeSet<AttributeId>,
}

/// Parameter object for reconstructing a persisted computer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedComputerData {
    /// Persisted identifier.
    pub id: ComputerId,
    /// Persisted name.
    pub name: String,
    /// Persisted project.
    pub project: ProjectId,
    /// Persisted status.
    pub status: ComputerStatus,
    /// Attributes discovered at check-in.
    pub sync_attributes: BTreeSet<AttributeId>,
    /// Administrator-assigned tags.
    pub tags: BTreeSet<AttributeId>,
}

impl Computer {
    /// Registers a new computer in `intended` status.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryDomainError::EmptyComputerName`] when the name is
    /// blank.
    pub fn new(name: impl Into<String>, project: ProjectId) -> Result<Self, InventoryDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(InventoryDomainError::EmptyComputerName);
        }
        Ok(Self {
            id: ComputerId::new(),
            name: trimmed.to_owned(),
            project,
            status: ComputerStatus::Intended,
            sync_attributes: BTreeSet::new(),
            tags: BTreeSet::new(),
        })
    }

    /// Reconstructs a computer from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedComputerData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            project: data.project,
            status: data.status,
            sync_attributes: data.sync_attributes,
            tags: data.tags,
        }
    }

    /// Sets the status.
    #[must_use]
    pub const fn with_status(mut self, status: ComputerStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the attributes discovered at check-in.
    #[must_use]
    pub fn with_sync_attributes(mut self, attributes: impl IntoIterator<Item = AttributeId>) -> Self {
        self.sync_attributes = attributes.into_iter().collect();
        self
    }

    /// Sets the administrator-assigned tags without validation.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = AttributeId>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    /// Returns the computer identifier.
    #[must_use]
    pub const fn id(&self) -> ComputerId {
        self.id
    }

    /// Returns the computer name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the project the computer runs.
    #[must_use]
    pub const fn project(&self) -> ProjectId {
        self.project
    }

    /// Returns the administrative status.
    #[must_use]
    pub const fn status(&self) -> ComputerStatus {
        self.status
    }

    /// Returns attributes discovered at check-in.
    #[must_use]
    pub const fn sync_attributes(&self) -> &BTreeSet<AttributeId> {
        &self.sync_attributes
    }

    /// Returns administrator-assigned tags.
    #[must_use]
    pub const fn tags(&self) -> &BTreeSet<AttributeId> {
        &self.tags
    }

    /// Returns the effective attribute set: sync attributes and tags.
    #[must_use]
    pub fn attributes(&self) -> BTreeSet<AttributeId> {
        self.sync_attributes.union(&self.tags).copied().collect()
    }

    /// Returns `true` when the computer carries `attribute` from any source.
    #[must_use]
    pub fn has_attribute(&self, attribute: AttributeId) -> bool {
        self.sync_attributes.contains(&attribute) || self.tags.contains(&attribute)
    }

    /// Changes the administrative status.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TagsOnAvailableComputer`] when moving a
    /// tagged computer to `available`.
    pub fn change_status(&mut self, status: ComputerStatus) -> Result<(), ValidationError> {
        if status == ComputerStatus::Available && !self.tags.is_empty() {
            return Err(ValidationError::TagsOnAvailableComputer);
        }
        self.status = status;
        Ok(())
    }

    /// Replaces the tags.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TagsOnAvailableComputer`] when assigning
    /// tags to an `available` computer.
    pub fn replace_tags(&mut self, tags: BTreeSet<AttributeId>) -> Result<(), ValidationError> {
        if self.status == ComputerStatus::Available && !tags.is_empty() {
            return Err(ValidationError::TagsOnAvailableComputer);
        }
        self.tags = tags;
        Ok(())
    }

    /// Adds and removes sync attributes, returning `true` when anything
    /// changed.
    pub fn reconcile_sync_attributes(
        &mut self,
        add: &BTreeSet<AttributeId>,
        remove: &BTreeSet<AttributeId>,
    ) -> bool {
        let before = self.sync_attributes.clone();
        self.sync_attributes.retain(|attribute| !remove.contains(attribute));
        self.sync_attributes.extend(add.iter().copied());
        before != self.sync_attributes
    }
}
