//! Domain model for packages, deployments, and repository manifests.

mod context;
mod deployment;
mod error;
mod ids;
mod manifest;
mod matcher;
mod package;

pub use context::RequestContext;
pub use deployment::{Deployment, PersistedDeploymentData, is_single_path_segment};
pub use error::DeploymentDomainError;
pub use ids::{DeploymentId, PackageId};
pub use manifest::{ManifestPackage, RepositoryManifest};
pub use matcher::matches;
pub use package::Package;
