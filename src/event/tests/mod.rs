//! Unit tests for the event log.

mod domain_tests;
