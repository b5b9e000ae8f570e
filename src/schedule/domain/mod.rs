//! Domain model for schedules, delay tiers, and business-day offsets.

mod delay;
mod error;
mod horizon;
mod ids;
mod schedule;

pub use delay::ScheduleDelay;
pub use error::ScheduleDomainError;
pub use horizon::horizon;
pub use ids::ScheduleId;
pub use schedule::{PersistedScheduleData, Schedule, Timeline};
