//! Domain model for users, domains, scopes, and visibility snapshots.

mod error;
mod fleet_domain;
mod ids;
mod resolver;
mod scope;
mod snapshot;
mod user;

pub use error::ScopeDomainError;
pub use fleet_domain::Domain;
pub use ids::{DomainId, ScopeId, UserId};
pub use resolver::resolve_visibility;
pub use scope::Scope;
pub use snapshot::{ScopeSnapshot, Visibility};
pub use user::UserProfile;
