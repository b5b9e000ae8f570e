//! Scope resolution: which computers an administrator may see.
//!
//! Visibility is derived from the domains assigned to a user and the
//! scopes the user owns. The result is cached as a [`domain::ScopeSnapshot`]
//! and only recomputed through an explicit
//! [`services::ScopeService::update_scope`] call.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
