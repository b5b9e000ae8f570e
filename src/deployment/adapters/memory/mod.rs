//! In-memory deployment adapters.

mod deployment;
mod metadata;

pub use deployment::InMemoryDeploymentRepository;
pub use metadata::InMemoryMetadataBuilder;
