//! Event kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Kind of an event record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A fault reported by a client-side fault definition.
    Fault,
    /// An error reported by a client.
    Error,
    /// A server-side notification.
    Notification,
    /// A computer moved to another project.
    Migration,
    /// A client synchronized with the server.
    Synchronization,
    /// A computer changed status.
    StatusLog,
}

impl EventKind {
    /// All kinds in display order.
    pub const ALL: [Self; 6] = [
        Self::Fault,
        Self::Error,
        Self::Notification,
        Self::Migration,
        Self::Synchronization,
        Self::StatusLog,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fault => "fault",
            Self::Error => "error",
            Self::Notification => "notification",
            Self::Migration => "migration",
            Self::Synchronization => "synchronization",
            Self::StatusLog => "status_log",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned while parsing event kinds.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown event kind: {0}")]
pub struct ParseEventKindError(pub String);

impl TryFrom<&str> for EventKind {
    type Error = ParseEventKindError;

    fn try_from(value: &str) -> Result<Self, ParseEventKindError> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ParseEventKindError(value.to_owned()))
    }
}
