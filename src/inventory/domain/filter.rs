//! Inclusion/exclusion filters over computer attributes.

use super::{AttributeId, Computer, ProjectId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Attribute filter shared by domains, scopes, deployments, and attribute
/// sets.
///
/// A computer is admitted when its attributes contain every included
/// attribute, none of the excluded ones, and its project is in `projects`.
/// Empty `included` and empty `projects` are wildcards. Exclusion wins over
/// inclusion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeFilter {
    included: BTreeSet<AttributeId>,
    excluded: BTreeSet<AttributeId>,
    projects: BTreeSet<ProjectId>,
}

impl AttributeFilter {
    /// Creates a filter admitting every computer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the included attributes.
    #[must_use]
    pub fn including(mut self, attributes: impl IntoIterator<Item = AttributeId>) -> Self {
        self.included = attributes.into_iter().collect();
        self
    }

    /// Sets the excluded attributes.
    #[must_use]
    pub fn excluding(mut self, attributes: impl IntoIterator<Item = AttributeId>) -> Self {
        self.excluded = attributes.into_iter().collect();
        self
    }

    /// Restricts the filter to computers of the given projects.
    #[must_use]
    pub fn within_projects(mut self, projects: impl IntoIterator<Item = ProjectId>) -> Self {
        self.projects = projects.into_iter().collect();
        self
    }

    /// Returns the included attributes.
    #[must_use]
    pub const fn included(&self) -> &BTreeSet<AttributeId> {
        &self.included
    }

    /// Returns the excluded attributes.
    #[must_use]
    pub const fn excluded(&self) -> &BTreeSet<AttributeId> {
        &self.excluded
    }

    /// Returns the project restriction; empty means every project.
    #[must_use]
    pub const fn projects(&self) -> &BTreeSet<ProjectId> {
        &self.projects
    }

    /// Returns every attribute the filter refers to.
    #[must_use]
    pub fn referenced_attributes(&self) -> BTreeSet<AttributeId> {
        self.included.union(&self.excluded).copied().collect()
    }

    /// Returns `true` when `attributes` satisfy the inclusion and exclusion
    /// lists.
    #[must_use]
    pub fn admits_attributes(&self, attributes: &BTreeSet<AttributeId>) -> bool {
        self.excluded.is_disjoint(attributes) && self.included.is_subset(attributes)
    }

    /// Returns `true` when `project` satisfies the project restriction.
    #[must_use]
    pub fn admits_project(&self, project: ProjectId) -> bool {
        self.projects.is_empty() || self.projects.contains(&project)
    }

    /// Returns `true` when the computer passes every criterion.
    #[must_use]
    pub fn admits(&self, computer: &Computer) -> bool {
        self.admits_project(computer.project()) && self.admits_attributes(&computer.attributes())
    }
}
