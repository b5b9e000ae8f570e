//! Error types for scope domain validation.

use thiserror::Error;

/// Errors returned while constructing scope domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScopeDomainError {
    /// The domain name is empty or contains whitespace.
    #[error("invalid domain name '{0}'")]
    InvalidDomainName(String),

    /// The scope name is empty after trimming.
    #[error("scope name must not be empty")]
    EmptyScopeName,

    /// The username is empty after trimming.
    #[error("username must not be empty")]
    EmptyUsername,
}
