//! Application state shared across all handlers.

use std::sync::Arc;

use pulse_core::config::AppConfig;
use pulse_database::NotificationStore;
use pulse_dispatch::{DispatchEngine, ReadRetentionManager};
use pulse_realtime::NotificationFeed;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Persisted notification rows
    pub store: Arc<dyn NotificationStore>,
    /// Per-tenant insertion-event feed
    pub feed: Arc<NotificationFeed>,
    /// Dispatch engine
    pub engine: Arc<DispatchEngine>,
    /// Bulk read-state transitions and purge
    pub retention: Arc<ReadRetentionManager>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish()
    }
}
