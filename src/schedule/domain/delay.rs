//! Delay tiers of a rollout schedule.

use super::horizon;
use crate::inventory::domain::{AttributeId, Computer};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One tier of a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDelay {
    delay: u32,
    duration: u32,
    attributes: BTreeSet<AttributeId>,
}

impl ScheduleDelay {
    /// Creates a tier applying to every computer.
    #[must_use]
    pub const fn new(delay: u32, duration: u32) -> Self {
        Self {
            delay,
            duration,
            attributes: BTreeSet::new(),
        }
    }

    /// Restricts the tier to computers carrying any of `attributes`.
    #[must_use]
    pub fn with_attributes(mut self, attributes: impl IntoIterator<Item = AttributeId>) -> Self {
        self.attributes = attributes.into_iter().collect();
        self
    }

    /// Returns the business-day offset from the start date.
    #[must_use]
    pub const fn delay(&self) -> u32 {
        self.delay
    }

    /// Returns how many business days the tier stays open.
    #[must_use]
    pub const fn duration(&self) -> u32 {
        self.duration
    }

    /// Returns the attributes selecting the tier's computers; empty selects
    /// every computer.
    #[must_use]
    pub const fn attributes(&self) -> &BTreeSet<AttributeId> {
        &self.attributes
    }

    /// Returns `true` when the tier applies to `computer`.
    #[must_use]
    pub fn admits(&self, computer: &Computer) -> bool {
        self.attributes.is_empty()
            || self
                .attributes
                .iter()
                .any(|attribute| computer.has_attribute(*attribute))
    }

    /// Returns the first day of the tier.
    #[must_use]
    pub fn opens(&self, start: NaiveDate) -> NaiveDate {
        horizon(start, self.delay)
    }

    /// Returns the first day after the tier.
    #[must_use]
    pub fn closes(&self, start: NaiveDate) -> NaiveDate {
        horizon(start, self.delay.saturating_add(self.duration))
    }

    /// Returns `true` when `today` falls inside the tier.
    #[must_use]
    pub fn is_open(&self, start: NaiveDate, today: NaiveDate) -> bool {
        self.opens(start) <= today && today < self.closes(start)
    }

    /// Returns `true` when the two tiers share days and may share
    /// computers.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        let (earlier, later) = if self.delay <= other.delay {
            (self, other)
        } else {
            (other, self)
        };
        let shares_days = later.delay < earlier.delay.saturating_add(earlier.duration);
        let shares_computers = earlier.attributes.is_empty()
            || later.attributes.is_empty()
            || !earlier.attributes.is_disjoint(&later.attributes);
        shares_days && shares_computers
    }
}
