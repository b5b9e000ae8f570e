//! Unit tests for saved queries.
