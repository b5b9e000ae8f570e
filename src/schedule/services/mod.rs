//! Application services for staged rollouts.

mod rollout;

pub use rollout::{RolloutService, RolloutServiceError, RolloutServiceResult, TierSummary};
