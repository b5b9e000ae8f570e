//! Unit tests for the inventory module.

mod attribute_set_tests;
mod domain_tests;
mod service_tests;
