//! In-memory scope adapters.

mod scope;

pub use scope::InMemoryScopeRepository;
