//! Event creation, acknowledgement, and statistics.

use crate::event::{
    domain::{AutoCheckRule, AutoChecker, EventId, EventKind, EventRecord, MonthKey},
    ports::{EventRepository, EventRepositoryError},
};
use crate::inventory::domain::{ComputerId, ComputerStatus, ProjectId};
use crate::scope::domain::Visibility;
use chrono::NaiveDate;
use mockable::Clock;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Service-level errors for event operations.
#[derive(Debug, Error)]
pub enum EventServiceError {
    /// Event repository operation failed.
    #[error(transparent)]
    Repository(#[from] EventRepositoryError),
    /// The auto-check pattern is not a valid regular expression.
    #[error("invalid auto-check pattern {pattern}: {message}")]
    InvalidPattern {
        /// Rejected pattern.
        pattern: String,
        /// Regex compiler message.
        message: String,
    },
}

/// Result type for event service operations.
pub type EventServiceResult<T> = Result<T, EventServiceError>;

/// Monthly event counts keyed by project; `None` collects records without
/// a project.
pub type ProjectMonthlyCounts = BTreeMap<Option<ProjectId>, BTreeMap<MonthKey, u64>>;

/// Event recording and acknowledgement service.
///
/// Statistics honour a computer visibility: records about a computer count
/// only when the computer is visible, records without a computer always
/// count.
#[derive(Clone)]
pub struct EventService<E, C>
where
    E: EventRepository,
    C: Clock + Send + Sync,
{
    events: Arc<E>,
    clock: Arc<C>,
}

impl<E, C> EventService<E, C>
where
    E: EventRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new event service.
    #[must_use]
    pub const fn new(events: Arc<E>, clock: Arc<C>) -> Self {
        Self { events, clock }
    }

    /// Records an error reported by a client.
    ///
    /// The description is normalized to `\n` line endings and matched
    /// against the auto-check rules; the first matching rule acknowledges
    /// the record before it is stored.
    ///
    /// # Errors
    ///
    /// Returns [`EventServiceError::Repository`] on persistence failures.
    pub async fn create_error(
        &self,
        computer: ComputerId,
        project: ProjectId,
        description: &str,
    ) -> EventServiceResult<EventRecord> {
        let mut record = EventRecord::error(computer, project, description, &*self.clock);
        let rules = self.events.list_rules().await?;
        let checker = AutoChecker::compile(&rules);
        if let Some(rule) = record
            .error_description()
            .and_then(|text| checker.first_match(text))
        {
            record.auto_check(rule, &*self.clock);
            debug!(event_id = %record.id(), rule_id = %rule, "auto-checked error");
        }
        self.events.append(&record).await?;
        Ok(record)
    }

    /// Records a fired fault definition.
    ///
    /// # Errors
    ///
    /// Returns [`EventServiceError::Repository`] on persistence failures.
    pub async fn create_fault(
        &self,
        computer: ComputerId,
        project: ProjectId,
        definition: &str,
        result: &str,
    ) -> EventServiceResult<EventRecord> {
        let record = EventRecord::fault(computer, project, definition, result, &*self.clock);
        self.append(record).await
    }

    /// Records a computer moving to `project`.
    ///
    /// # Errors
    ///
    /// Returns [`EventServiceError::Repository`] on persistence failures.
    pub async fn record_migration(
        &self,
        computer: ComputerId,
        project: ProjectId,
    ) -> EventServiceResult<EventRecord> {
        self.append(EventRecord::migration(computer, project, &*self.clock))
            .await
    }

    /// Records a client synchronization.
    ///
    /// # Errors
    ///
    /// Returns [`EventServiceError::Repository`] on persistence failures.
    pub async fn record_synchronization(
        &self,
        computer: ComputerId,
        project: ProjectId,
        consumer: Option<String>,
    ) -> EventServiceResult<EventRecord> {
        self.append(EventRecord::synchronization(
            computer,
            project,
            consumer,
            &*self.clock,
        ))
        .await
    }

    /// Records a status change.
    ///
    /// # Errors
    ///
    /// Returns [`EventServiceError::Repository`] on persistence failures.
    pub async fn record_status_change(
        &self,
        computer: ComputerId,
        project: ProjectId,
        status: ComputerStatus,
    ) -> EventServiceResult<EventRecord> {
        self.append(EventRecord::status_log(computer, project, status, &*self.clock))
            .await
    }

    /// Records a notification for administrators.
    ///
    /// # Errors
    ///
    /// Returns [`EventServiceError::Repository`] on persistence failures.
    pub async fn notify(&self, message: &str) -> EventServiceResult<EventRecord> {
        self.append(EventRecord::notification(message, &*self.clock))
            .await
    }

    /// Acknowledges the selected records in one atomic write.
    ///
    /// Records already checked keep their acknowledgement and an id
    /// selected twice is acknowledged once. Returns the number of records
    /// that changed.
    ///
    /// # Errors
    ///
    /// Returns [`EventRepositoryError::NotFound`] (wrapped) when a selected
    /// record does not exist; nothing is acknowledged in that case.
    pub async fn checked_ok(&self, ids: &[EventId]) -> EventServiceResult<usize> {
        let selected: BTreeSet<EventId> = ids.iter().copied().collect();
        let mut changed = Vec::with_capacity(selected.len());
        for id in selected {
            let mut record = self
                .events
                .find(id)
                .await?
                .ok_or(EventRepositoryError::NotFound(id))?;
            if record.check_ok(&*self.clock) {
                changed.push(record);
            }
        }
        self.events.update_all(&changed).await?;
        info!(selected = ids.len(), checked = changed.len(), "acknowledged events");
        Ok(changed.len())
    }

    /// Counts unchecked records of `kind` within `visibility`.
    ///
    /// # Errors
    ///
    /// Returns [`EventServiceError::Repository`] on persistence failures.
    pub async fn unchecked_count(
        &self,
        kind: EventKind,
        visibility: &Visibility<ComputerId>,
    ) -> EventServiceResult<u64> {
        let records = self.events.list(kind).await?;
        Ok(records
            .iter()
            .filter(|record| !record.is_checked() && is_visible(record, visibility))
            .fold(0_u64, |total, _| total.saturating_add(1)))
    }

    /// Counts visible records of `kind` per project.
    ///
    /// # Errors
    ///
    /// Returns [`EventServiceError::Repository`] on persistence failures.
    pub async fn count_by_project(
        &self,
        kind: EventKind,
        visibility: &Visibility<ComputerId>,
    ) -> EventServiceResult<BTreeMap<Option<ProjectId>, u64>> {
        let records = self.events.list(kind).await?;
        let mut counts = BTreeMap::new();
        for record in records.iter().filter(|record| is_visible(record, visibility)) {
            let count = counts.entry(record.project()).or_insert(0_u64);
            *count = count.saturating_add(1);
        }
        Ok(counts)
    }

    /// Counts visible records of `kind` per project and month between
    /// `begin` and `end`, both included.
    ///
    /// Every project with at least one record in range carries an entry
    /// for each month of the range, zero when nothing happened.
    ///
    /// # Errors
    ///
    /// Returns [`EventServiceError::Repository`] on persistence failures.
    pub async fn stacked_by_month(
        &self,
        kind: EventKind,
        begin: NaiveDate,
        end: NaiveDate,
        visibility: &Visibility<ComputerId>,
    ) -> EventServiceResult<ProjectMonthlyCounts> {
        let months = MonthKey::range(begin, end);
        let records = self.events.list(kind).await?;
        let mut stacked = ProjectMonthlyCounts::new();
        for record in records.iter().filter(|record| {
            let day = record.created_at().date_naive();
            is_visible(record, visibility) && day >= begin && day <= end
        }) {
            let per_month = stacked
                .entry(record.project())
                .or_insert_with(|| months.iter().map(|month| (*month, 0)).collect());
            let count = per_month
                .entry(MonthKey::of(record.created_at().date_naive()))
                .or_insert(0);
            *count = count.saturating_add(1);
        }
        Ok(stacked)
    }

    /// Stores a new auto-check rule after compiling its pattern.
    ///
    /// Existing records are not re-evaluated.
    ///
    /// # Errors
    ///
    /// Returns [`EventServiceError::InvalidPattern`] when the pattern does
    /// not compile. Patterns use `regex` syntax, so lookaround and
    /// backreferences are rejected here rather than skipped later.
    pub async fn add_auto_check_rule(&self, pattern: &str) -> EventServiceResult<AutoCheckRule> {
        Regex::new(pattern).map_err(|err| EventServiceError::InvalidPattern {
            pattern: pattern.to_owned(),
            message: err.to_string(),
        })?;
        let rule = AutoCheckRule::new(pattern);
        self.events.save_rule(&rule).await?;
        info!(rule_id = %rule.id(), pattern, "added auto-check rule");
        Ok(rule)
    }

    async fn append(&self, record: EventRecord) -> EventServiceResult<EventRecord> {
        self.events.append(&record).await?;
        debug!(event_id = %record.id(), kind = %record.kind(), "recorded event");
        Ok(record)
    }
}

fn is_visible(record: &EventRecord, visibility: &Visibility<ComputerId>) -> bool {
    record
        .computer()
        .is_none_or(|computer| visibility.allows(&computer))
}
