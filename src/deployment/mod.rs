//! Deployments: named package-delivery units matched against computers.
//!
//! A deployment targets the computers of one project that satisfy its
//! attribute filter and, when bound to a domain, the domain's filter.
//! Saving a deployment validates it in full, persists it, and then asks the
//! repository metadata builder to publish the package manifest.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
