//! Results of deployment saves and metadata regeneration.

use crate::deployment::domain::{Deployment, RepositoryManifest};

/// Result of the metadata step that follows a committed save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataStatus {
    /// Nothing relevant to the published metadata changed.
    Unchanged,
    /// Metadata was regenerated.
    Regenerated {
        /// Calls made, including failed ones.
        attempts: u8,
        /// The published manifest.
        manifest: RepositoryManifest,
    },
    /// Every attempt failed; the deployment stays saved.
    Failed {
        /// Calls made.
        attempts: u8,
        /// Message of the last failure.
        warning: String,
    },
}

impl MetadataStatus {
    /// Returns `true` when metadata was regenerated.
    #[must_use]
    pub const fn is_regenerated(&self) -> bool {
        matches!(self, Self::Regenerated { .. })
    }

    /// Returns `true` when every regeneration attempt failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Outcome of a committed deployment save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentSaveOutcome {
    /// The stored deployment.
    pub deployment: Deployment,
    /// What happened to the repository metadata.
    pub metadata: MetadataStatus,
    /// Non-fatal problems the caller should surface to the user.
    pub warnings: Vec<String>,
}
