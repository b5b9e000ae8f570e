//! Port contracts for saved queries.

pub mod repository;

pub use repository::{SavedQueryRepository, SavedQueryRepositoryError, SavedQueryRepositoryResult};
