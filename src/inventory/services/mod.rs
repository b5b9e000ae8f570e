//! Application services for the attribute store.

mod attribute_store;

pub use attribute_store::{AttributeStoreService, InventoryServiceError, InventoryServiceResult};
