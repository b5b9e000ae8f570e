//! Error types for inventory domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing inventory domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InventoryDomainError {
    /// The property prefix is empty or contains whitespace.
    #[error("invalid property prefix '{0}'")]
    InvalidProperty(String),

    /// The attribute value is empty after trimming.
    #[error("attribute value must not be empty")]
    EmptyAttributeValue,

    /// The computer name is empty after trimming.
    #[error("computer name must not be empty")]
    EmptyComputerName,

    /// The attribute set name is empty after trimming.
    #[error("attribute set name must not be empty")]
    EmptyAttributeSetName,
}

/// Error returned while parsing computer statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown computer status: {0}")]
pub struct ParseComputerStatusError(pub String);

/// Error returned while parsing attribute kinds from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown attribute kind: {0}")]
pub struct ParseAttributeKindError(pub String);
