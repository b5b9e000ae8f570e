//! Request payload for saving deployments.

use crate::deployment::domain::{Deployment, DeploymentId, PackageId};
use crate::inventory::domain::{AttributeId, ProjectId};
use crate::schedule::domain::ScheduleId;
use crate::scope::domain::DomainId;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Request payload for creating or editing a deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveDeploymentRequest {
    pub(super) id: Option<DeploymentId>,
    pub(super) name: String,
    pub(super) project: ProjectId,
    pub(super) start_date: NaiveDate,
    pub(super) enabled: bool,
    pub(super) comment: Option<String>,
    pub(super) available_packages: BTreeSet<PackageId>,
    pub(super) packages_to_install: Vec<String>,
    pub(super) packages_to_remove: Vec<String>,
    pub(super) included: BTreeSet<AttributeId>,
    pub(super) excluded: BTreeSet<AttributeId>,
    pub(super) domain: Option<DomainId>,
    pub(super) schedule: Option<ScheduleId>,
}

impl SaveDeploymentRequest {
    /// Creates a request for a new enabled deployment.
    #[must_use]
    pub fn new(name: impl Into<String>, project: ProjectId, start_date: NaiveDate) -> Self {
        Self {
            id: None,
            name: name.into(),
            project,
            start_date,
            enabled: true,
            comment: None,
            available_packages: BTreeSet::new(),
            packages_to_install: Vec::new(),
            packages_to_remove: Vec::new(),
            included: BTreeSet::new(),
            excluded: BTreeSet::new(),
            domain: None,
            schedule: None,
        }
    }

    /// Creates a request editing `deployment`, prefilled with its state.
    #[must_use]
    pub fn edit(deployment: &Deployment) -> Self {
        Self {
            id: Some(deployment.id()),
            name: deployment.name().to_owned(),
            project: deployment.project(),
            start_date: deployment.start_date(),
            enabled: deployment.is_enabled(),
            comment: deployment.comment().map(str::to_owned),
            available_packages: deployment.available_packages().clone(),
            packages_to_install: deployment.packages_to_install().to_vec(),
            packages_to_remove: deployment.packages_to_remove().to_vec(),
            included: deployment.included_attributes().clone(),
            excluded: deployment.excluded_attributes().clone(),
            domain: deployment.domain(),
            schedule: deployment.schedule(),
        }
    }

    /// Sets the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Enables or disables delivery.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sets the comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Sets the packages published in the deployment's repository.
    #[must_use]
    pub fn with_available_packages(mut self, packages: impl IntoIterator<Item = PackageId>) -> Self {
        self.available_packages = packages.into_iter().collect();
        self
    }

    /// Sets the package names clients install.
    #[must_use]
    pub fn with_packages_to_install(mut self, packages: impl IntoIterator<Item = String>) -> Self {
        self.packages_to_install = packages.into_iter().collect();
        self
    }

    /// Sets the package names clients remove.
    #[must_use]
    pub fn with_packages_to_remove(mut self, packages: impl IntoIterator<Item = String>) -> Self {
        self.packages_to_remove = packages.into_iter().collect();
        self
    }

    /// Sets the included attributes.
    #[must_use]
    pub fn with_included(mut self, attributes: impl IntoIterator<Item = AttributeId>) -> Self {
        self.included = attributes.into_iter().collect();
        self
    }

    /// Sets the excluded attributes.
    #[must_use]
    pub fn with_excluded(mut self, attributes: impl IntoIterator<Item = AttributeId>) -> Self {
        self.excluded = attributes.into_iter().collect();
        self
    }

    /// Binds the deployment to a domain.
    #[must_use]
    pub const fn with_domain(mut self, domain: DomainId) -> Self {
        self.domain = Some(domain);
        self
    }

    /// Sets the rollout schedule.
    #[must_use]
    pub const fn with_schedule(mut self, schedule: ScheduleId) -> Self {
        self.schedule = Some(schedule);
        self
    }

    /// Sets the day the rollout schedule starts counting from.
    #[must_use]
    pub const fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = start_date;
        self
    }

    /// Returns every attribute the request refers to.
    #[must_use]
    pub fn referenced_attributes(&self) -> BTreeSet<AttributeId> {
        self.included.union(&self.excluded).copied().collect()
    }
}
