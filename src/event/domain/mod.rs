//! Domain model for event records, auto-check rules, and statistics.

mod auto_check;
mod ids;
mod kind;
mod record;
mod stats;

pub use auto_check::{AutoCheckRule, AutoChecker};
pub use ids::{AutoCheckRuleId, EventId};
pub use kind::{EventKind, ParseEventKindError};
pub use record::{EventPayload, EventRecord};
pub use stats::MonthKey;
