//! Identifier types for the schedule bounded context.

use crate::identifier::uuid_identifier;

uuid_identifier! {
    /// Unique identifier for a rollout schedule.
    ScheduleId
}
