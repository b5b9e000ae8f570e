//! Fleetscope: attribute-scoped deployment resolution for a managed fleet.
//!
//! This crate decides which computers an administrator may see, which
//! deployments each computer receives, and when a staged rollout reaches
//! it. It also keeps the fault and error records administrators
//! acknowledge, and evaluates saved inventory queries.
//!
//! # Architecture
//!
//! Fleetscope follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence and external tasks
//! - **Adapters**: Concrete implementations of ports (in-memory, PostgreSQL,
//!   filesystem)
//!
//! # Modules
//!
//! - [`inventory`]: Computers, attributes, and attribute sets
//! - [`scope`]: Domains, scopes, and per-user visibility snapshots
//! - [`deployment`]: Deployment matching, saving, and repository metadata
//! - [`schedule`]: Business-day rollout schedules
//! - [`event`]: Fault, error, and notification acknowledgement
//! - [`query`]: Saved declarative queries
//! - [`config`]: Engine configuration
//! - [`validation`]: Structured validation failures

pub mod config;
pub mod deployment;
pub mod event;
pub(crate) mod identifier;
pub mod inventory;
pub mod query;
pub mod schedule;
pub mod scope;
pub mod validation;
