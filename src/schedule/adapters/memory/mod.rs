//! In-memory schedule adapters.

mod schedule;

pub use schedule::InMemoryScheduleRepository;
