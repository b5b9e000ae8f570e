//! Identifier types for the event bounded context.

use crate::identifier::uuid_identifier;

uuid_identifier! {
    /// Unique identifier for an event record.
    EventId
}

uuid_identifier! {
    /// Unique identifier for an auto-check rule.
    AutoCheckRuleId
}
