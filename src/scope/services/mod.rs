//! Application services for scope resolution.

mod resolver;

pub use resolver::{ScopeService, ScopeServiceError, ScopeServiceResult};
