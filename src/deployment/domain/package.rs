//! Packages available to deployments.

use super::{DeploymentDomainError, PackageId};
use crate::inventory::domain::ProjectId;
use serde::{Deserialize, Serialize};

/// A package built for one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    id: PackageId,
    name: String,
    project: ProjectId,
}

impl Package {
    /// Creates a package.
    ///
    /// # Errors
    ///
    /// Returns [`DeploymentDomainError::EmptyPackageName`] when the name is
    /// blank.
    pub fn new(name: impl Into<String>, project: ProjectId) -> Result<Self, DeploymentDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DeploymentDomainError::EmptyPackageName);
        }
        Ok(Self {
            id: PackageId::new(),
            name: trimmed.to_owned(),
            project,
        })
    }

    /// Returns the package identifier.
    #[must_use]
    pub const fn id(&self) -> PackageId {
        self.id
    }

    /// Returns the package file name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the project the package was built for.
    #[must_use]
    pub const fn project(&self) -> ProjectId {
        self.project
    }
}
