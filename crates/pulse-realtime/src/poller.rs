//! Polling fallback: bell-icon summary for clients without a live feed.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use pulse_core::config::realtime::RealtimeConfig;
use pulse_core::result::AppResult;
use pulse_core::types::pagination::PageQuery;
use pulse_database::{NotificationFilter, NotificationPage, NotificationStore};
use pulse_entity::NotificationStatus;

/// Periodic pull of recent notifications plus total and unread counts.
///
/// User actions mutate the cached summary optimistically; if the
/// corresponding store write fails, the cache is rolled back to a fresh
/// pull.
pub struct BellPoller {
    business_id: Uuid,
    store: Arc<dyn NotificationStore>,
    page: PageQuery,
    interval: Duration,
    current: Option<NotificationPage>,
}

impl std::fmt::Debug for BellPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BellPoller")
            .field("business_id", &self.business_id)
            .field("interval", &self.interval)
            .finish()
    }
}

impl BellPoller {
    /// Create a poller for one tenant.
    pub fn new(
        business_id: Uuid,
        store: Arc<dyn NotificationStore>,
        config: &RealtimeConfig,
    ) -> Self {
        Self {
            business_id,
            store,
            page: PageQuery::default(),
            interval: Duration::from_secs(config.poll_interval_seconds),
            current: None,
        }
    }

    /// The pull cadence.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// The cached summary from the last pull, if any.
    pub fn current(&self) -> Option<&NotificationPage> {
        self.current.as_ref()
    }

    /// Pull a fresh summary from the store.
    pub async fn refresh(&mut self) -> AppResult<&NotificationPage> {
        let page = self
            .store
            .query(self.business_id, &NotificationFilter::default(), self.page)
            .await?;
        Ok(self.current.insert(page))
    }

    /// Mark the given ids read: optimistic local mutation first, then the
    /// store write; a failed write rolls back to a fresh pull.
    pub async fn mark_read(&mut self, ids: &[Uuid]) -> AppResult<u64> {
        if let Some(cache) = self.current.as_mut() {
            for n in cache.notifications.iter_mut() {
                if ids.contains(&n.id) && n.is_unread() {
                    n.status = NotificationStatus::Read;
                    cache.unread_count = (cache.unread_count - 1).max(0);
                }
            }
        }

        match self
            .store
            .mark_read(self.business_id, ids, chrono::Utc::now())
            .await
        {
            Ok(changed) => Ok(changed),
            Err(e) => {
                tracing::warn!(error = %e, "mark_read write failed, re-pulling summary");
                self.refresh().await.ok();
                Err(e)
            }
        }
    }

    /// Mark everything read with the same optimistic/rollback contract.
    pub async fn mark_all_read(&mut self) -> AppResult<u64> {
        if let Some(cache) = self.current.as_mut() {
            for n in cache.notifications.iter_mut() {
                if n.is_unread() {
                    n.status = NotificationStatus::Read;
                }
            }
            cache.unread_count = 0;
        }

        match self
            .store
            .mark_all_read(self.business_id, chrono::Utc::now())
            .await
        {
            Ok(changed) => Ok(changed),
            Err(e) => {
                tracing::warn!(error = %e, "mark_all_read write failed, re-pulling summary");
                self.refresh().await.ok();
                Err(e)
            }
        }
    }
}
