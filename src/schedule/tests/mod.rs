//! Unit tests for staged rollout schedules.
