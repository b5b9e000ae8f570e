//! Rollout schedules.

use super::{ScheduleDelay, ScheduleDomainError, ScheduleId};
use crate::inventory::domain::Computer;
use crate::validation::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A named list of delay tiers ordered by ascending delay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    id: ScheduleId,
    name: String,
    description: Option<String>,
    delays: Vec<ScheduleDelay>,
}

/// Parameter object for reconstructing a persisted schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedScheduleData {
    /// Persisted identifier.
    pub id: ScheduleId,
    /// Persisted name.
    pub name: String,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted tiers in any order.
    pub delays: Vec<ScheduleDelay>,
}

/// Calendar window covered by a schedule for one start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    /// Opening day of the first tier.
    pub begins: NaiveDate,
    /// First day after the last tier.
    pub ends: NaiveDate,
}

impl Schedule {
    /// Creates a schedule without tiers.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleDomainError::EmptyScheduleName`] when the name is
    /// blank.
    pub fn new(name: impl Into<String>) -> Result<Self, ScheduleDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ScheduleDomainError::EmptyScheduleName);
        }
        Ok(Self {
            id: ScheduleId::new(),
            name: trimmed.to_owned(),
            description: None,
            delays: Vec::new(),
        })
    }

    /// Reconstructs a schedule from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedScheduleData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            delays: sorted(data.delays),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the tiers.
    #[must_use]
    pub fn with_delays(mut self, delays: impl IntoIterator<Item = ScheduleDelay>) -> Self {
        self.delays = sorted(delays.into_iter().collect());
        self
    }

    /// Returns the schedule identifier.
    #[must_use]
    pub const fn id(&self) -> ScheduleId {
        self.id
    }

    /// Returns the schedule name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the tiers by ascending delay.
    #[must_use]
    pub fn delays(&self) -> &[ScheduleDelay] {
        &self.delays
    }

    /// Collects authoring errors.
    ///
    /// Zero-day tiers and repeated delays are always rejected. Overlapping
    /// tiers are reported only when `reject_overlaps` is set; otherwise the
    /// lowest delay wins at read time.
    #[must_use]
    pub fn validate(&self, reject_overlaps: bool) -> Vec<ValidationError> {
        let mut errors: Vec<ValidationError> = self
            .delays
            .iter()
            .filter(|tier| tier.duration() == 0)
            .map(|tier| ValidationError::EmptyDelayDuration { delay: tier.delay() })
            .collect();

        let mut seen = BTreeSet::new();
        let mut duplicates = BTreeSet::new();
        for tier in &self.delays {
            if !seen.insert(tier.delay()) {
                duplicates.insert(tier.delay());
            }
        }
        errors.extend(duplicates.into_iter().map(ValidationError::DuplicateDelay));

        if reject_overlaps {
            for (position, earlier) in self.delays.iter().enumerate() {
                errors.extend(
                    self.delays
                        .iter()
                        .skip(position.saturating_add(1))
                        .filter(|later| later.delay() != earlier.delay() && earlier.overlaps(later))
                        .map(|later| ValidationError::OverlappingDelays {
                            first: earlier.delay(),
                            second: later.delay(),
                        }),
                );
            }
        }
        errors
    }

    /// Returns the open tier that applies to `computer` on `today`.
    ///
    /// When several tiers qualify, the one with the lowest delay wins.
    #[must_use]
    pub fn tier_for(
        &self,
        computer: &Computer,
        start: NaiveDate,
        today: NaiveDate,
    ) -> Option<&ScheduleDelay> {
        self.delays
            .iter()
            .find(|tier| tier.admits(computer) && tier.is_open(start, today))
    }

    /// Returns the first tier by delay that applies to `computer`,
    /// regardless of date.
    #[must_use]
    pub fn assigned_tier(&self, computer: &Computer) -> Option<&ScheduleDelay> {
        self.delays.iter().find(|tier| tier.admits(computer))
    }

    /// Returns `true` once any tier applying to `computer` has opened.
    ///
    /// A computer stays reached after its tier closes.
    #[must_use]
    pub fn has_reached(&self, computer: &Computer, start: NaiveDate, today: NaiveDate) -> bool {
        self.delays
            .iter()
            .any(|tier| tier.admits(computer) && tier.opens(start) <= today)
    }

    /// Returns the window from the first tier's opening to the last tier's
    /// end, or `None` for a schedule without tiers.
    #[must_use]
    pub fn timeline(&self, start: NaiveDate) -> Option<Timeline> {
        let first = self.delays.first()?;
        let last = self.delays.last()?;
        Some(Timeline {
            begins: first.opens(start),
            ends: last.closes(start),
        })
    }
}

fn sorted(mut delays: Vec<ScheduleDelay>) -> Vec<ScheduleDelay> {
    delays.sort_by_key(ScheduleDelay::delay);
    delays
}
