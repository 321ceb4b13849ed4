//! Live-feed and polling fallback configuration.

use serde::{Deserialize, Serialize};

/// Settings for the live consumption layer and bell poller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Internal buffer size for per-tenant broadcast channels.
    #[serde(default = "default_feed_buffer")]
    pub feed_buffer_size: usize,
    /// Delay after an insertion event before surfacing it, in milliseconds.
    ///
    /// Avoids racing the persistence write that produced the event.
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,
    /// Capacity of the per-session recently-shown and dismissed id sets.
    #[serde(default = "default_dedup_capacity")]
    pub dedup_capacity: usize,
    /// Bell poller pull interval in seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            feed_buffer_size: default_feed_buffer(),
            settle_delay_ms: default_settle_delay(),
            dedup_capacity: default_dedup_capacity(),
            poll_interval_seconds: default_poll_interval(),
        }
    }
}

fn default_feed_buffer() -> usize {
    256
}

fn default_settle_delay() -> u64 {
    100
}

fn default_dedup_capacity() -> usize {
    100
}

fn default_poll_interval() -> u64 {
    30
}
