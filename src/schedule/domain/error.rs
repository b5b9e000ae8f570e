//! Error types for schedule domain validation.

use thiserror::Error;

/// Errors returned while constructing schedule domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScheduleDomainError {
    /// The schedule name is empty after trimming.
    #[error("schedule name must not be empty")]
    EmptyScheduleName,
}
