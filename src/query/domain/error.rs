//! Error types for query definitions.

use super::QuerySubject;
use thiserror::Error;

/// Errors returned while constructing query definitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryDomainError {
    /// The query name is empty after trimming.
    #[error("query name must not be empty")]
    EmptyQueryName,

    /// A filter or projection names a field the subject does not have.
    #[error("unknown field '{field}' for {subject}")]
    UnknownField {
        /// Subject of the query.
        subject: QuerySubject,
        /// The unknown field.
        field: String,
    },

    /// A parameter name is empty.
    #[error("parameter names must not be empty")]
    EmptyParameterName,
}
