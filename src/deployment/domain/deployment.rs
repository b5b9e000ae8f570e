//! The deployment aggregate.

use super::{DeploymentDomainError, DeploymentId, PackageId};
use crate::inventory::domain::{AttributeFilter, AttributeId, ProjectId};
use crate::schedule::domain::ScheduleId;
use crate::scope::domain::DomainId;
use camino::{Utf8Component, Utf8Path};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A named unit delivering packages to matching computers of one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    id: DeploymentId,
    name: String,
    project: ProjectId,
    enabled: bool,
    comment: Option<String>,
    available_packages: BTreeSet<PackageId>,
    packages_to_install: Vec<String>,
    packages_to_remove: Vec<String>,
    filter: AttributeFilter,
    domain: Option<DomainId>,
    schedule: Option<ScheduleId>,
    start_date: NaiveDate,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedDeploymentData {
    /// Persisted identifier.
    pub id: DeploymentId,
    /// Persisted name.
    pub name: String,
    /// Target project.
    pub project: ProjectId,
    /// Whether the deployment is delivered.
    pub enabled: bool,
    /// Free-form comment.
    pub comment: Option<String>,
    /// Packages published in the deployment's repository.
    pub available_packages: BTreeSet<PackageId>,
    /// Package names clients install.
    pub packages_to_install: Vec<String>,
    /// Package names clients remove.
    pub packages_to_remove: Vec<String>,
    /// Included and excluded attributes.
    pub filter: AttributeFilter,
    /// Owning domain, if any.
    pub domain: Option<DomainId>,
    /// Rollout schedule, if any.
    pub schedule: Option<ScheduleId>,
    /// Day the rollout schedule starts counting from.
    pub start_date: NaiveDate,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Returns `true` when `name` is exactly one normal path component, so it
/// can name a metadata directory without escaping its project.
#[must_use]
pub fn is_single_path_segment(name: &str) -> bool {
    let mut components = Utf8Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Utf8Component::Normal(segment)), None) if segment == name
    )
}

fn validated_name(raw: &str) -> Result<String, DeploymentDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DeploymentDomainError::EmptyDeploymentName);
    }
    if trimmed.chars().any(|ch| matches!(ch, '/' | '\\') || ch.is_control())
        || !is_single_path_segment(trimmed)
    {
        return Err(DeploymentDomainError::InvalidDeploymentName(raw.to_owned()));
    }
    Ok(trimmed.to_owned())
}

impl Deployment {
    /// Creates an enabled deployment without packages or filter.
    ///
    /// # Errors
    ///
    /// Returns [`DeploymentDomainError`] when the name is blank, contains a
    /// path separator, or is a relative path component such as `..`.
    pub fn new(
        name: &str,
        project: ProjectId,
        start_date: NaiveDate,
        clock: &impl Clock,
    ) -> Result<Self, DeploymentDomainError> {
        let timestamp = clock.utc();
        Ok(Self {
            id: DeploymentId::new(),
            name: validated_name(name)?,
            project,
            enabled: true,
            comment: None,
            available_packages: BTreeSet::new(),
            packages_to_install: Vec::new(),
            packages_to_remove: Vec::new(),
            filter: AttributeFilter::new(),
            domain: None,
            schedule: None,
            start_date,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a deployment from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedDeploymentData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            project: data.project,
            enabled: data.enabled,
            comment: data.comment,
            available_packages: data.available_packages,
            packages_to_install: data.packages_to_install,
            packages_to_remove: data.packages_to_remove,
            filter: data.filter,
            domain: data.domain,
            schedule: data.schedule,
            start_date: data.start_date,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Enables or disables delivery.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sets the comment.
    #[must_use]
    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment;
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

    /// Sets the included and excluded attributes; any project restriction
    /// is ignored in favour of the deployment's project.
    #[must_use]
    pub fn with_attributes(
        mut self,
        included: impl IntoIterator<Item = AttributeId>,
        excluded: impl IntoIterator<Item = AttributeId>,
    ) -> Self {
        self.filter = AttributeFilter::new().including(included).excluding(excluded);
        self
    }

    /// Binds the deployment to a domain.
    #[must_use]
    pub const fn with_domain(mut self, domain: Option<DomainId>) -> Self {
        self.domain = domain;
        self
    }

    /// Sets the rollout schedule.
    #[must_use]
    pub const fn with_schedule(mut self, schedule: Option<ScheduleId>) -> Self {
        self.schedule = schedule;
        self
    }

    /// Returns the deployment identifier.
    #[must_use]
    pub const fn id(&self) -> DeploymentId {
        self.id
    }

    /// Returns the deployment name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the target project.
    #[must_use]
    pub const fn project(&self) -> ProjectId {
        self.project
    }

    /// Returns `true` when the deployment is delivered.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the comment, if any.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Returns the packages published in the deployment's repository.
    #[must_use]
    pub const fn available_packages(&self) -> &BTreeSet<PackageId> {
        &self.available_packages
    }

    /// Returns the package names clients install.
    #[must_use]
    pub fn packages_to_install(&self) -> &[String] {
        &self.packages_to_install
    }

    /// Returns the package names clients remove.
    #[must_use]
    pub fn packages_to_remove(&self) -> &[String] {
        &self.packages_to_remove
    }

    /// Returns the attribute filter.
    #[must_use]
    pub const fn filter(&self) -> &AttributeFilter {
        &self.filter
    }

    /// Returns the included attributes.
    #[must_use]
    pub const fn included_attributes(&self) -> &BTreeSet<AttributeId> {
        self.filter.included()
    }

    /// Returns the excluded attributes.
    #[must_use]
    pub const fn excluded_attributes(&self) -> &BTreeSet<AttributeId> {
        self.filter.excluded()
    }

    /// Returns the owning domain, if any.
    #[must_use]
    pub const fn domain(&self) -> Option<DomainId> {
        self.domain
    }

    /// Returns the rollout schedule, if any.
    #[must_use]
    pub const fn schedule(&self) -> Option<ScheduleId> {
        self.schedule
    }

    /// Returns the day the rollout schedule starts counting from.
    #[must_use]
    pub const fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Prefixes the name with `prefix` and an underscore unless it already
    /// starts with `prefix`.
    pub fn apply_prefix(&mut self, prefix: &str) {
        if !self.name.starts_with(prefix) {
            self.name = format!("{prefix}_{}", self.name);
        }
    }

    /// Takes over the identity and creation time of a stored deployment.
    pub const fn continue_from(&mut self, stored: &Self) {
        self.id = stored.id;
        self.created_at = stored.created_at;
    }

    /// Returns `true` when `other` publishes a different package set.
    #[must_use]
    pub fn packages_differ(&self, other: &Self) -> bool {
        self.available_packages != other.available_packages
            || self.packages_to_install != other.packages_to_install
            || self.packages_to_remove != other.packages_to_remove
    }
}
