//! Error types for deployment domain validation.

use thiserror::Error;

/// Errors returned while constructing deployment domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeploymentDomainError {
    /// The deployment name is empty after trimming.
    #[error("deployment name must not be empty")]
    EmptyDeploymentName,

    /// The deployment name contains a path separator or control character.
    #[error("invalid deployment name '{0}'")]
    InvalidDeploymentName(String),

    /// The package name is empty after trimming.
    #[error("package name must not be empty")]
    EmptyPackageName,
}
