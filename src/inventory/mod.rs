//! Attribute store for the computer fleet.
//!
//! Computers carry attributes from two sources: properties discovered at
//! check-in (sync attributes) and tags assigned by administrators. This
//! module resolves a computer's effective attribute set, counts computers
//! per attribute within a caller's visibility, and maintains attribute
//! sets, whose circular references are rejected before commit.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
