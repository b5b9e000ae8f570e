//! Port contracts for the attribute store.
//!
//! Ports define infrastructure-agnostic interfaces used by inventory
//! services.

pub mod repository;

pub use repository::{InventoryRepository, InventoryRepositoryError, InventoryRepositoryResult};
