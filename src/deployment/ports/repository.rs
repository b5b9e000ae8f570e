//! Repository port for packages and deployments.

use crate::deployment::domain::{Deployment, DeploymentId, Package, PackageId};
use crate::inventory::domain::ProjectId;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

/// Result type for deployment repository operations.
pub type DeploymentRepositoryResult<T> = Result<T, DeploymentRepositoryError>;

/// Deployment persistence contract.
#[async_trait]
pub trait DeploymentRepository: Send + Sync {
    /// Stores a new package.
    async fn store_package(&self, package: &Package) -> DeploymentRepositoryResult<()>;

    /// Returns the packages whose identifiers are in `ids`; unknown
    /// identifiers are skipped.
    async fn find_packages(&self, ids: &BTreeSet<PackageId>) -> DeploymentRepositoryResult<Vec<Package>>;

    /// Returns packages, optionally restricted to one project, ordered by
    /// name.
    async fn list_packages(&self, project: Option<ProjectId>) -> DeploymentRepositoryResult<Vec<Package>>;

    /// Inserts or replaces a deployment in one atomic write.
    ///
    /// # Errors
    ///
    /// Returns [`DeploymentRepositoryError::DuplicateName`] when another
    /// deployment of the same project already uses the name.
    async fn save(&self, deployment: &Deployment) -> DeploymentRepositoryResult<()>;

    /// Finds a deployment by identifier.
    async fn find_by_id(&self, id: DeploymentId) -> DeploymentRepositoryResult<Option<Deployment>>;

    /// Returns deployments, optionally restricted to one project, ordered
    /// by name.
    async fn list(&self, project: Option<ProjectId>) -> DeploymentRepositoryResult<Vec<Deployment>>;
}

/// Errors returned by deployment repository implementations.
#[derive(Debug, Clone, Error)]
pub enum DeploymentRepositoryError {
    /// Another deployment of the project already uses the name.
    #[error("deployment name already in use: {0}")]
    DuplicateName(String),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DeploymentRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
