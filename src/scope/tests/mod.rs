//! Unit tests for the scope module.

mod resolver_tests;
