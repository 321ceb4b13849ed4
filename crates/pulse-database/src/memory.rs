//! In-memory notification store for tests and single-process development.
//!
//! Mirrors the semantics of the PostgreSQL implementation, including the
//! event-log degradation when the primary table is flagged unavailable.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use pulse_core::error::AppError;
use pulse_core::result::AppResult;
use pulse_core::types::pagination::PageQuery;
use pulse_entity::{Notification, NotificationStatus};

use crate::store::{InsertOutcome, NotificationFilter, NotificationPage, NotificationStore};

/// A degraded-path write captured by the in-memory event log.
#[derive(Debug, Clone)]
pub struct EventLogEntry {
    /// Event id (same as the notification id).
    pub id: Uuid,
    /// Owning tenant.
    pub business_id: Uuid,
    /// Event discriminator.
    pub event_type: String,
    /// Full notification payload as JSON.
    pub payload: serde_json::Value,
}

/// Notification store held entirely in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<Notification>>,
    event_log: Mutex<Vec<EventLogEntry>>,
    primary_unavailable: AtomicBool,
    offline: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the notifications relation being missing: subsequent
    /// inserts degrade into the event log.
    pub fn set_primary_unavailable(&self, unavailable: bool) {
        self.primary_unavailable
            .store(unavailable, Ordering::SeqCst);
    }

    /// Simulate the whole store being unreachable: `ping` starts failing.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Snapshot of the degraded-path event log.
    pub fn event_log(&self) -> Vec<EventLogEntry> {
        self.lock_log().clone()
    }

    /// Snapshot of every stored row (test inspection).
    pub fn snapshot(&self) -> Vec<Notification> {
        self.lock_rows().clone()
    }

    fn lock_rows(&self) -> std::sync::MutexGuard<'_, Vec<Notification>> {
        self.rows.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_log(&self) -> std::sync::MutexGuard<'_, Vec<EventLogEntry>> {
        self.event_log.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn matches_filter(n: &Notification, filter: &NotificationFilter) -> bool {
    if n.is_dismissed() {
        return false;
    }
    if filter.unread_only && !n.is_unread() {
        return false;
    }
    if let Some(kind) = filter.kind {
        if n.kind != kind {
            return false;
        }
    }
    true
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::database("Store offline"));
        }
        Ok(())
    }

    async fn insert(&self, notification: &Notification) -> AppResult<InsertOutcome> {
        if self.primary_unavailable.load(Ordering::SeqCst) {
            self.lock_log().push(EventLogEntry {
                id: notification.id,
                business_id: notification.business_id,
                event_type: "notification".to_string(),
                payload: serde_json::to_value(notification)?,
            });
            return Ok(InsertOutcome::LoggedFallback);
        }
        self.lock_rows().push(notification.clone());
        Ok(InsertOutcome::Stored)
    }

    async fn get(&self, business_id: Uuid, id: Uuid) -> AppResult<Option<Notification>> {
        Ok(self
            .lock_rows()
            .iter()
            .find(|n| n.business_id == business_id && n.id == id)
            .cloned())
    }

    async fn mark_sent(&self, business_id: Uuid, id: Uuid, at: DateTime<Utc>) -> AppResult<bool> {
        let mut rows = self.lock_rows();
        for n in rows.iter_mut() {
            if n.business_id == business_id
                && n.id == id
                && n.status == NotificationStatus::Pending
            {
                n.status = NotificationStatus::Sent;
                n.sent_at = Some(at);
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn mark_failed(&self, business_id: Uuid, id: Uuid, error: &str) -> AppResult<bool> {
        let mut rows = self.lock_rows();
        for n in rows.iter_mut() {
            if n.business_id == business_id
                && n.id == id
                && n.status == NotificationStatus::Pending
            {
                n.status = NotificationStatus::Failed;
                n.error = Some(error.to_string());
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn query(
        &self,
        business_id: Uuid,
        filter: &NotificationFilter,
        page: PageQuery,
    ) -> AppResult<NotificationPage> {
        let rows = self.lock_rows();

        let mut matching: Vec<&Notification> = rows
            .iter()
            .filter(|n| n.business_id == business_id && matches_filter(n, filter))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as i64;
        let notifications = matching
            .into_iter()
            .skip(page.offset.max(0) as usize)
            .take(page.limit.max(0) as usize)
            .cloned()
            .collect();

        let unread_count = rows
            .iter()
            .filter(|n| n.business_id == business_id && n.is_unread())
            .count() as i64;

        Ok(NotificationPage {
            notifications,
            total,
            unread_count,
        })
    }

    async fn mark_read(
        &self,
        business_id: Uuid,
        ids: &[Uuid],
        at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let mut changed = 0;
        let mut rows = self.lock_rows();
        for n in rows.iter_mut() {
            if n.business_id == business_id
                && ids.contains(&n.id)
                && n.status != NotificationStatus::Read
            {
                n.status = NotificationStatus::Read;
                n.read_at = Some(at);
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn mark_all_read(&self, business_id: Uuid, at: DateTime<Utc>) -> AppResult<u64> {
        let mut changed = 0;
        let mut rows = self.lock_rows();
        for n in rows.iter_mut() {
            // failed rows stay put unless explicitly targeted
            if n.business_id == business_id && n.status.is_unread() {
                n.status = NotificationStatus::Read;
                n.read_at = Some(at);
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn dismiss(&self, business_id: Uuid, ids: &[Uuid], at: DateTime<Utc>) -> AppResult<u64> {
        let mut changed = 0;
        let mut rows = self.lock_rows();
        for n in rows.iter_mut() {
            if n.business_id == business_id && ids.contains(&n.id) {
                if n.status != NotificationStatus::Read {
                    n.status = NotificationStatus::Read;
                }
                if n.read_at.is_none() {
                    n.read_at = Some(at);
                }
                if let Some(map) = n.metadata.as_object_mut() {
                    map.insert("dismissed".to_string(), serde_json::Value::Bool(true));
                } else {
                    n.metadata = serde_json::json!({ "dismissed": true });
                }
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn purge_read_before(
        &self,
        business_id: Option<Uuid>,
        cutoff: DateTime<Utc>,
    ) -> AppResult<u64> {
        let mut rows = self.lock_rows();
        let before = rows.len();
        rows.retain(|n| {
            let in_scope = business_id.map(|b| n.business_id == b).unwrap_or(true);
            !(in_scope && n.status == NotificationStatus::Read && n.created_at < cutoff)
        });
        Ok((before - rows.len()) as u64)
    }

    async fn due_scheduled(&self, now: DateTime<Utc>, limit: i64) -> AppResult<Vec<Notification>> {
        let rows = self.lock_rows();
        let mut due: Vec<Notification> = rows
            .iter()
            .filter(|n| {
                n.status == NotificationStatus::Pending
                    && n.scheduled_for.map(|at| at <= now).unwrap_or(false)
            })
            .cloned()
            .collect();
        due.sort_by_key(|n| n.scheduled_for);
        due.truncate(limit.max(0) as usize);
        Ok(due)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_entity::{Channel, NotificationType, Priority};

    fn row(business_id: Uuid, channel: Channel) -> Notification {
        Notification::pending(
            business_id,
            NotificationType::NewLead,
            channel,
            Priority::Medium,
            "title",
            "message",
            serde_json::json!({}),
            None,
        )
    }

    #[tokio::test]
    async fn ping_reflects_the_offline_toggle() {
        let store = MemoryStore::new();
        assert!(store.ping().await.is_ok());
        store.set_offline(true);
        assert!(store.ping().await.is_err());
        store.set_offline(false);
        assert!(store.ping().await.is_ok());
    }

    #[tokio::test]
    async fn insert_degrades_to_event_log_when_primary_unavailable() {
        let store = MemoryStore::new();
        store.set_primary_unavailable(true);

        let n = row(Uuid::new_v4(), Channel::InApp);
        let outcome = store.insert(&n).await.unwrap();

        assert_eq!(outcome, InsertOutcome::LoggedFallback);
        assert!(store.snapshot().is_empty());
        let log = store.event_log();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].id, n.id);
        assert_eq!(log[0].event_type, "notification");
        assert_eq!(log[0].payload["title"], "title");
    }

    #[tokio::test]
    async fn mark_read_is_idempotent() {
        let store = MemoryStore::new();
        let n = row(Uuid::new_v4(), Channel::InApp);
        store.insert(&n).await.unwrap();

        let first = store
            .mark_read(n.business_id, &[n.id], Utc::now())
            .await
            .unwrap();
        let second = store
            .mark_read(n.business_id, &[n.id], Utc::now())
            .await
            .unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 0);
        let stored = store.get(n.business_id, n.id).await.unwrap().unwrap();
        assert_eq!(stored.status, NotificationStatus::Read);
        assert!(stored.read_at.is_some());
    }

    #[tokio::test]
    async fn mark_all_read_skips_failed_rows() {
        let store = MemoryStore::new();
        let business_id = Uuid::new_v4();

        let pending = row(business_id, Channel::InApp);
        let failed = row(business_id, Channel::Sms);
        store.insert(&pending).await.unwrap();
        store.insert(&failed).await.unwrap();
        store
            .mark_failed(business_id, failed.id, "gateway down")
            .await
            .unwrap();

        let changed = store.mark_all_read(business_id, Utc::now()).await.unwrap();
        assert_eq!(changed, 1);

        let still_failed = store.get(business_id, failed.id).await.unwrap().unwrap();
        assert_eq!(still_failed.status, NotificationStatus::Failed);

        // but an explicit mark_read does acknowledge a failed row
        store
            .mark_read(business_id, &[failed.id], Utc::now())
            .await
            .unwrap();
        let acked = store.get(business_id, failed.id).await.unwrap().unwrap();
        assert_eq!(acked.status, NotificationStatus::Read);
    }

    #[tokio::test]
    async fn second_mark_all_read_changes_nothing() {
        let store = MemoryStore::new();
        let business_id = Uuid::new_v4();
        store.insert(&row(business_id, Channel::InApp)).await.unwrap();
        store.insert(&row(business_id, Channel::Push)).await.unwrap();

        assert_eq!(store.mark_all_read(business_id, Utc::now()).await.unwrap(), 2);
        assert_eq!(store.mark_all_read(business_id, Utc::now()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn dismiss_sets_marker_and_hides_from_query() {
        let store = MemoryStore::new();
        let n = row(Uuid::new_v4(), Channel::InApp);
        store.insert(&n).await.unwrap();

        store.dismiss(n.business_id, &[n.id], Utc::now()).await.unwrap();

        let stored = store.get(n.business_id, n.id).await.unwrap().unwrap();
        assert_eq!(stored.status, NotificationStatus::Read);
        assert!(stored.is_dismissed());

        let page = store
            .query(n.business_id, &NotificationFilter::default(), PageQuery::default())
            .await
            .unwrap();
        assert_eq!(page.total, 0);
        assert!(page.notifications.is_empty());
    }

    #[tokio::test]
    async fn purge_only_removes_old_read_rows() {
        let store = MemoryStore::new();
        let business_id = Uuid::new_v4();

        let mut old_read = row(business_id, Channel::InApp);
        old_read.created_at = Utc::now() - chrono::Duration::days(45);
        let mut old_unread = row(business_id, Channel::InApp);
        old_unread.created_at = Utc::now() - chrono::Duration::days(45);
        let fresh_read = row(business_id, Channel::InApp);

        store.insert(&old_read).await.unwrap();
        store.insert(&old_unread).await.unwrap();
        store.insert(&fresh_read).await.unwrap();
        store
            .mark_read(business_id, &[old_read.id, fresh_read.id], Utc::now())
            .await
            .unwrap();

        let cutoff = Utc::now() - chrono::Duration::days(30);
        let purged = store
            .purge_read_before(Some(business_id), cutoff)
            .await
            .unwrap();

        assert_eq!(purged, 1);
        assert!(store.get(business_id, old_read.id).await.unwrap().is_none());
        assert!(store.get(business_id, old_unread.id).await.unwrap().is_some());
        assert!(store.get(business_id, fresh_read.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn queries_never_cross_tenants() {
        let store = MemoryStore::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let n_a = row(a, Channel::InApp);
        let n_b = row(b, Channel::InApp);
        store.insert(&n_a).await.unwrap();
        store.insert(&n_b).await.unwrap();

        let page = store
            .query(a, &NotificationFilter::default(), PageQuery::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.notifications[0].id, n_a.id);

        // b's ids are invisible to a's bulk actions
        let changed = store.mark_read(a, &[n_b.id], Utc::now()).await.unwrap();
        assert_eq!(changed, 0);
    }

    #[tokio::test]
    async fn due_scheduled_returns_only_due_pending_rows() {
        let store = MemoryStore::new();
        let business_id = Uuid::new_v4();
        let now = Utc::now();

        let mut due = row(business_id, Channel::InApp);
        due.scheduled_for = Some(now - chrono::Duration::minutes(1));
        let mut future = row(business_id, Channel::InApp);
        future.scheduled_for = Some(now + chrono::Duration::hours(1));
        let immediate = row(business_id, Channel::InApp);

        store.insert(&due).await.unwrap();
        store.insert(&future).await.unwrap();
        store.insert(&immediate).await.unwrap();

        let scan = store.due_scheduled(now, 50).await.unwrap();
        assert_eq!(scan.len(), 1);
        assert_eq!(scan[0].id, due.id);
    }
}
