//! # pulse-realtime
//!
//! The live consumption layer: a per-tenant insertion-event feed, the
//! session-side dedup and display lifecycle, and the polling fallback for
//! clients without an active subscription.

pub mod dedup;
pub mod feed;
pub mod poller;
pub mod session;

pub use dedup::BoundedIdSet;
pub use feed::{FeedEvent, NotificationFeed};
pub use poller::BellPoller;
pub use session::{LiveSession, Toast};
