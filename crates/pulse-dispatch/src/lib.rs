//! Notification dispatch: fan-out across channels, delivery, and
//! read/retention state management.

pub mod engine;
pub mod outcome;
pub mod request;
pub mod retention;

pub use engine::DispatchEngine;
pub use outcome::{ChannelResult, DispatchOutcome, DispatchStatus};
pub use request::DispatchRequest;
pub use retention::{ReadRetentionManager, DEFAULT_RETENTION_DAYS};
