//! In-memory saved query adapters.

mod query;

pub use query::InMemorySavedQueryRepository;
