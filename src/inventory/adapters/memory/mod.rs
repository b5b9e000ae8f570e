//! In-memory inventory adapters.

mod inventory;

pub use inventory::InMemoryInventoryRepository;
