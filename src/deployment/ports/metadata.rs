//! Port for the external repository metadata builder.
//!
//! Metadata generation runs after a deployment is committed and may fail
//! independently of it. Implementations must be idempotent: publishing the
//! same deployment state twice yields the same manifest.

use crate::deployment::domain::{Deployment, Package, RepositoryManifest, RequestContext};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Builds and removes the package repository metadata of deployments.
#[async_trait]
pub trait RepositoryMetadataBuilder: Send + Sync {
    /// Publishes the repository metadata of `deployment`.
    ///
    /// `packages` are the deployment's available packages.
    async fn create_repository_metadata(
        &self,
        deployment: &Deployment,
        packages: &[Package],
        context: &RequestContext,
    ) -> Result<RepositoryManifest, MetadataError>;

    /// Removes the metadata published under `old_name`.
    async fn remove_repository_metadata(
        &self,
        context: &RequestContext,
        deployment: &Deployment,
        old_name: &str,
    ) -> Result<(), MetadataError>;
}

/// Failures of the external metadata builder.
#[derive(Debug, Clone, Error)]
pub enum MetadataError {
    /// The builder could not be reached or refused the task.
    #[error("metadata builder unavailable: {0}")]
    Unavailable(String),

    /// Writing or removing metadata failed.
    #[error("metadata i/o failed: {0}")]
    Io(Arc<std::io::Error>),

    /// The deployment name does not map to a single directory.
    #[error("deployment name '{0}' is not a single path component")]
    InvalidPath(String),

    /// The manifest could not be serialized.
    #[error("manifest serialization failed: {0}")]
    Serialization(String),
}

impl MetadataError {
    /// Wraps an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}
