//! `PostgreSQL` adapters for inventory persistence.

mod models;
mod repository;
mod schema;

pub use repository::{InventoryPgPool, PostgresInventoryRepository};
