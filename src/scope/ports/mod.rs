//! Port contracts for scope resolution.

pub mod repository;

pub use repository::{ScopeRepository, ScopeRepositoryError, ScopeRepositoryResult};
