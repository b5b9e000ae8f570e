//! Application services for event records.

mod acknowledgement;

pub use acknowledgement::{EventService, EventServiceError, EventServiceResult, ProjectMonthlyCounts};
