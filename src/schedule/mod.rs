//! Staged rollout schedules measured in business days.
//!
//! A schedule is an ordered list of delay tiers. Each tier opens a
//! business-day offset after the deployment's start date, lasts a number of
//! days, and applies to the computers carrying any of its attributes (or to
//! every computer when it lists none). When tiers overlap, the tier with the
//! lowest delay wins.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
