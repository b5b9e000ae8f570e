//! Append-only event records with an acknowledgement flag.

use super::{AutoCheckRuleId, EventId, EventKind};
use crate::inventory::domain::{ComputerId, ComputerStatus, ProjectId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Kind-specific content of an event record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventPayload {
    /// A fault definition fired on a client.
    Fault {
        /// Name of the fault definition.
        definition: String,
        /// Output of the fault check.
        result: String,
    },
    /// A client reported an error.
    Error {
        /// Error text with line endings normalized to `\n`.
        description: String,
    },
    /// A server-side message for administrators.
    Notification {
        /// Message text.
        message: String,
    },
    /// A computer moved to the record's project.
    Migration,
    /// A client synchronized.
    Synchronization {
        /// Client application that triggered the synchronization.
        consumer: Option<String>,
    },
    /// A computer changed status.
    StatusLog {
        /// The new status.
        status: ComputerStatus,
    },
}

impl EventPayload {
    /// Returns the event kind of the payload.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Fault { .. } => EventKind::Fault,
            Self::Error { .. } => EventKind::Error,
            Self::Notification { .. } => EventKind::Notification,
            Self::Migration => EventKind::Migration,
            Self::Synchronization { .. } => EventKind::Synchronization,
            Self::StatusLog { .. } => EventKind::StatusLog,
        }
    }
}

/// An event keyed by computer, project, and creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    id: EventId,
    computer: Option<ComputerId>,
    project: Option<ProjectId>,
    created_at: DateTime<Utc>,
    payload: EventPayload,
    checked: bool,
    checked_at: Option<DateTime<Utc>>,
    auto_checked_by: Option<AutoCheckRuleId>,
}

impl EventRecord {
    fn create(
        computer: Option<ComputerId>,
        project: Option<ProjectId>,
        payload: EventPayload,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: EventId::new(),
            computer,
            project,
            created_at: clock.utc(),
            payload,
            checked: false,
            checked_at: None,
            auto_checked_by: None,
        }
    }

    /// Creates an unchecked fault record.
    #[must_use]
    pub fn fault(
        computer: ComputerId,
        project: ProjectId,
        definition: impl Into<String>,
        result: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        let payload = EventPayload::Fault {
            definition: definition.into(),
            result: result.into(),
        };
        Self::create(Some(computer), Some(project), payload, clock)
    }

    /// Creates an unchecked error record, normalizing CRLF to LF.
    #[must_use]
    pub fn error(
        computer: ComputerId,
        project: ProjectId,
        description: &str,
        clock: &impl Clock,
    ) -> Self {
        let payload = EventPayload::Error {
            description: description.replace("\r\n", "\n"),
        };
        Self::create(Some(computer), Some(project), payload, clock)
    }

    /// Creates an unchecked notification, which concerns no computer.
    #[must_use]
    pub fn notification(message: impl Into<String>, clock: &impl Clock) -> Self {
        let payload = EventPayload::Notification {
            message: message.into(),
        };
        Self::create(None, None, payload, clock)
    }

    /// Creates a migration record for `computer` moving to `project`.
    #[must_use]
    pub fn migration(computer: ComputerId, project: ProjectId, clock: &impl Clock) -> Self {
        Self::create(Some(computer), Some(project), EventPayload::Migration, clock)
    }

    /// Creates a synchronization record.
    #[must_use]
    pub fn synchronization(
        computer: ComputerId,
        project: ProjectId,
        consumer: Option<String>,
        clock: &impl Clock,
    ) -> Self {
        let payload = EventPayload::Synchronization { consumer };
        Self::create(Some(computer), Some(project), payload, clock)
    }

    /// Creates a status change record.
    #[must_use]
    pub fn status_log(
        computer: ComputerId,
        project: ProjectId,
        status: ComputerStatus,
        clock: &impl Clock,
    ) -> Self {
        let payload = EventPayload::StatusLog { status };
        Self::create(Some(computer), Some(project), payload, clock)
    }

    /// Returns the record identifier.
    #[must_use]
    pub const fn id(&self) -> EventId {
        self.id
    }

    /// Returns the record kind.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        self.payload.kind()
    }

    /// Returns the computer concerned, if any.
    #[must_use]
    pub const fn computer(&self) -> Option<ComputerId> {
        self.computer
    }

    /// Returns the project concerned, if any.
    #[must_use]
    pub const fn project(&self) -> Option<ProjectId> {
        self.project
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the kind-specific content.
    #[must_use]
    pub const fn payload(&self) -> &EventPayload {
        &self.payload
    }

    /// Returns the normalized description of an error record.
    #[must_use]
    pub fn error_description(&self) -> Option<&str> {
        match &self.payload {
            EventPayload::Error { description } => Some(description.as_str()),
            _ => None,
        }
    }

    /// Returns `true` once the record was acknowledged.
    #[must_use]
    pub const fn is_checked(&self) -> bool {
        self.checked
    }

    /// Returns when the record was acknowledged.
    #[must_use]
    pub const fn checked_at(&self) -> Option<DateTime<Utc>> {
        self.checked_at
    }

    /// Returns the rule that acknowledged the record on arrival.
    #[must_use]
    pub const fn auto_checked_by(&self) -> Option<AutoCheckRuleId> {
        self.auto_checked_by
    }

    /// Acknowledges the record.
    ///
    /// Returns `false` when the record was already checked; the original
    /// acknowledgement time is kept.
    pub fn check_ok(&mut self, clock: &impl Clock) -> bool {
        if self.checked {
            return false;
        }
        self.checked = true;
        self.checked_at = Some(clock.utc());
        true
    }

    /// Acknowledges the record on behalf of an auto-check rule.
    pub fn auto_check(&mut self, rule: AutoCheckRuleId, clock: &impl Clock) {
        if self.check_ok(clock) {
            self.auto_checked_by = Some(rule);
        }
    }
}
