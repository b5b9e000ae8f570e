//! Saved, declarative inventory queries.
//!
//! A saved query names a subject, a list of filters, and the fields to
//! show. Filter values are literals or named parameters supplied when the
//! query runs. A fixed evaluator interprets the definition against the
//! inventory and deployment repositories, restricted to what the caller may
//! see.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
