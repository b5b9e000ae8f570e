//! Adapter implementations for saved query ports.

pub mod memory;
