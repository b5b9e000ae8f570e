//! Adapter implementations for schedule ports.

pub mod memory;
