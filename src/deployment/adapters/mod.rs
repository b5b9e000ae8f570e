//! Adapter implementations for deployment ports.

pub mod filesystem;
pub mod memory;
