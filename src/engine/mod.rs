//! The alert deduplication and scheduling core.

pub mod dedup;
pub mod scheduler;

pub use dedup::AlertDeduplicator;
pub use scheduler::Scheduler;
