//! Step definitions for deployment matching scenarios.

pub mod world;

mod given;
mod then;
mod when;
