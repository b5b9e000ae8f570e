//! Deterministic description of a deployment's package repository.

use super::{Deployment, Package, PackageId};
use crate::inventory::domain::ProjectId;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A package entry in a repository manifest.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ManifestPackage {
    /// Package file name.
    pub name: String,
    /// Package identifier.
    pub id: PackageId,
}

/// Repository metadata published for one deployment.
///
/// Entries are sorted so that building the manifest twice from the same
/// state yields byte-identical output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryManifest {
    deployment: String,
    project: ProjectId,
    packages: Vec<ManifestPackage>,
    packages_to_install: Vec<String>,
    packages_to_remove: Vec<String>,
}

impl RepositoryManifest {
    /// Builds the manifest of `deployment` from the packages it publishes.
    ///
    /// Packages not listed among the deployment's available packages are
    /// ignored.
    #[must_use]
    pub fn build(deployment: &Deployment, packages: &[Package]) -> Self {
        let mut entries: Vec<ManifestPackage> = packages
            .iter()
            .filter(|package| deployment.available_packages().contains(&package.id()))
            .map(|package| ManifestPackage {
                name: package.name().to_owned(),
                id: package.id(),
            })
            .collect();
        entries.sort();
        entries.dedup();

        let mut to_install = deployment.packages_to_install().to_vec();
        to_install.sort();
        to_install.dedup();
        let mut to_remove = deployment.packages_to_remove().to_vec();
        to_remove.sort();
        to_remove.dedup();

        Self {
            deployment: deployment.name().to_owned(),
            project: deployment.project(),
            packages: entries,
            packages_to_install: to_install,
            packages_to_remove: to_remove,
        }
    }

    /// Returns the deployment name the manifest is published under.
    #[must_use]
    pub fn deployment(&self) -> &str {
        &self.deployment
    }

    /// Returns the project of the deployment.
    #[must_use]
    pub const fn project(&self) -> ProjectId {
        self.project
    }

    /// Returns the published packages, sorted by name.
    #[must_use]
    pub fn packages(&self) -> &[ManifestPackage] {
        &self.packages
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

    /// Renders the manifest as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Returns the hex-encoded SHA-256 checksum of `contents`.
    #[must_use]
    pub fn checksum(contents: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(contents.as_bytes());
        hasher
            .finalize()
            .iter()
            .map(|byte| format!("{byte:02x}"))
            .collect()
    }
}
