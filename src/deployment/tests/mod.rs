//! Unit tests for deployments.
