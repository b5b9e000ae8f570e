//! Fault, error, and notification records with their acknowledgement
//! lifecycle.
//!
//! Records are append-only. The only state change is the irreversible
//! `checked` flag, set by an administrator or, for errors, by the first
//! auto-check rule whose pattern occurs in the description.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
