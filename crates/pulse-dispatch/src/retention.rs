//! Bulk read-state transitions and age-based purge.

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use pulse_core::error::AppError;
use pulse_core::result::AppResult;
use pulse_database::NotificationStore;

/// Days a read notification is kept before it is eligible for purge.
pub const DEFAULT_RETENTION_DAYS: u32 = 30;

/// Bulk state transitions (mark-read, mark-all-read, dismiss) and the
/// age-gated purge of resolved rows.
pub struct ReadRetentionManager {
    store: Arc<dyn NotificationStore>,
}

impl std::fmt::Debug for ReadRetentionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadRetentionManager").finish()
    }
}

impl ReadRetentionManager {
    /// Create the manager over the store.
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }

    /// Mark the given rows read. Idempotent: re-marking an already-read
    /// row is a no-op, not an error. Returns the number of rows changed.
    pub async fn mark_read(&self, business_id: Uuid, ids: &[Uuid]) -> AppResult<u64> {
        if ids.is_empty() {
            return Err(AppError::validation("at least one notification id is required"));
        }
        self.store.mark_read(business_id, ids, Utc::now()).await
    }

    /// Mark every pending/sent row read for the tenant.
    ///
    /// Rows already `failed` are left alone unless explicitly targeted via
    /// [`mark_read`](Self::mark_read) or [`dismiss`](Self::dismiss).
    pub async fn mark_all_read(&self, business_id: Uuid) -> AppResult<u64> {
        self.store.mark_all_read(business_id, Utc::now()).await
    }

    /// Mark read plus the `metadata.dismissed` soft-delete marker.
    pub async fn dismiss(&self, business_id: Uuid, ids: &[Uuid]) -> AppResult<u64> {
        if ids.is_empty() {
            return Err(AppError::validation("at least one notification id is required"));
        }
        self.store.dismiss(business_id, ids, Utc::now()).await
    }

    /// Hard-delete read rows older than `older_than_days` (default 30).
    /// Rows not yet read are never purged regardless of age.
    pub async fn purge_old(
        &self,
        business_id: Uuid,
        older_than_days: Option<u32>,
    ) -> AppResult<u64> {
        let days = older_than_days.unwrap_or(DEFAULT_RETENTION_DAYS);
        let cutoff = Utc::now() - Duration::days(i64::from(days));
        let purged = self.store.purge_read_before(Some(business_id), cutoff).await?;
        tracing::info!(business_id = %business_id, days, purged, "retention purge complete");
        Ok(purged)
    }
}
