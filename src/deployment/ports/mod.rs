//! Port contracts for deployments.

pub mod metadata;
pub mod repository;

pub use metadata::{MetadataError, RepositoryMetadataBuilder};
pub use repository::{DeploymentRepository, DeploymentRepositoryError, DeploymentRepositoryResult};
