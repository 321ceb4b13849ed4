//! Per-tenant live session: dedup, settle delay, priority-driven lifecycle.

use std::sync::Arc;

use serde::Serialize;
use tokio::time::{Duration, sleep};
use uuid::Uuid;

use pulse_core::config::realtime::RealtimeConfig;
use pulse_database::NotificationStore;
use pulse_entity::{Notification, NotificationType, Priority};

use crate::dedup::BoundedIdSet;
use crate::feed::FeedEvent;

/// A notification surfaced to the client, with its display lifecycle
/// parameters resolved from priority.
#[derive(Debug, Clone, Serialize)]
pub struct Toast {
    /// The underlying row id.
    pub notification_id: Uuid,
    /// Event type. Serialized as `type` on the wire.
    #[serde(rename = "type")]
    pub kind: NotificationType,
    /// Display title.
    pub title: String,
    /// Display body.
    pub message: String,
    /// Priority the timing was derived from.
    pub priority: Priority,
    /// How long the toast stays up before auto-dismissing, in ms.
    pub auto_dismiss_ms: u64,
    /// Visible severity badge (urgent/high only).
    pub severity_badge: bool,
    /// Short audible cue on surface (urgent/high only).
    pub sound: bool,
}

impl Toast {
    fn from_notification(n: &Notification) -> Self {
        Self {
            notification_id: n.id,
            kind: n.kind,
            title: n.title.clone(),
            message: n.message.clone(),
            priority: n.priority,
            auto_dismiss_ms: n.priority.auto_dismiss_ms(),
            severity_badge: n.priority.has_severity_badge(),
            sound: n.priority.plays_sound(),
        }
    }
}

/// One tenant's live consumption session.
///
/// Consumes insertion events for a single business, deduplicates against
/// bounded per-session sets, and drives the mark-read lifecycle. Marking
/// read is invoked at most once per id from this session; the store-side
/// operation is idempotent, so at-least-once across sessions is safe too.
pub struct LiveSession {
    business_id: Uuid,
    store: Arc<dyn NotificationStore>,
    settle_delay: Duration,
    shown: BoundedIdSet,
    dismissed: BoundedIdSet,
    marked: BoundedIdSet,
}

impl std::fmt::Debug for LiveSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveSession")
            .field("business_id", &self.business_id)
            .finish()
    }
}

impl LiveSession {
    /// Create a session for one tenant.
    pub fn new(
        business_id: Uuid,
        store: Arc<dyn NotificationStore>,
        config: &RealtimeConfig,
    ) -> Self {
        Self {
            business_id,
            store,
            settle_delay: Duration::from_millis(config.settle_delay_ms),
            shown: BoundedIdSet::new(config.dedup_capacity),
            dismissed: BoundedIdSet::new(config.dedup_capacity),
            marked: BoundedIdSet::new(config.dedup_capacity),
        }
    }

    /// Process one feed event, returning a toast to surface if it passes
    /// the channel filter and dedup.
    ///
    /// The settle delay is applied before surfacing to avoid racing the
    /// persistence write that produced the event. Surfacing marks the row
    /// read: display is acknowledgement.
    pub async fn handle_event(&mut self, event: &FeedEvent) -> Option<Toast> {
        let FeedEvent::Inserted(n) = event;

        if n.business_id != self.business_id || !n.channel.is_live() {
            return None;
        }

        sleep(self.settle_delay).await;

        if self.dismissed.contains(&n.id) || !self.shown.insert(n.id) {
            tracing::trace!(notification_id = %n.id, "duplicate insertion event skipped");
            return None;
        }

        self.mark_read_once(n.id).await;
        Some(Toast::from_notification(n))
    }

    /// The client explicitly dismissed the toast.
    pub async fn dismiss(&mut self, notification_id: Uuid) {
        self.dismissed.insert(notification_id);
        self.mark_read_once(notification_id).await;
    }

    /// The toast's auto-dismiss timer fired.
    pub async fn toast_expired(&mut self, notification_id: Uuid) {
        self.mark_read_once(notification_id).await;
    }

    async fn mark_read_once(&mut self, notification_id: Uuid) {
        if !self.marked.insert(notification_id) {
            return;
        }
        if let Err(e) = self
            .store
            .mark_read(self.business_id, &[notification_id], chrono::Utc::now())
            .await
        {
            tracing::error!(
                notification_id = %notification_id,
                error = %e,
                "failed to mark notification read from live session"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_database::MemoryStore;
    use pulse_entity::{Channel, NotificationStatus};

    fn session(business_id: Uuid, store: Arc<MemoryStore>) -> LiveSession {
        LiveSession::new(business_id, store, &RealtimeConfig::default())
    }

    async fn stored_row(store: &MemoryStore, business_id: Uuid, channel: Channel) -> Notification {
        let n = Notification::pending(
            business_id,
            NotificationType::NewLead,
            channel,
            Priority::Urgent,
            "New lead",
            "Jordan asked for a quote",
            serde_json::json!({}),
            None,
        );
        store.insert(&n).await.unwrap();
        n
    }

    #[tokio::test(start_paused = true)]
    async fn surfaces_live_channels_and_marks_read() {
        let store = Arc::new(MemoryStore::new());
        let business_id = Uuid::new_v4();
        let n = stored_row(&store, business_id, Channel::InApp).await;
        let mut session = session(business_id, Arc::clone(&store));

        let toast = session
            .handle_event(&FeedEvent::Inserted(n.clone()))
            .await
            .expect("toast surfaced");

        assert_eq!(toast.notification_id, n.id);
        assert_eq!(toast.auto_dismiss_ms, 15_000);
        assert!(toast.severity_badge);
        assert!(toast.sound);

        let stored = store.get(business_id, n.id).await.unwrap().unwrap();
        assert_eq!(stored.status, NotificationStatus::Read);
    }

    #[tokio::test(start_paused = true)]
    async fn duplicate_events_surface_once() {
        let store = Arc::new(MemoryStore::new());
        let business_id = Uuid::new_v4();
        let n = stored_row(&store, business_id, Channel::Push).await;
        let mut session = session(business_id, store);

        let event = FeedEvent::Inserted(n);
        assert!(session.handle_event(&event).await.is_some());
        assert!(session.handle_event(&event).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn sms_and_email_rows_are_not_surfaced() {
        let store = Arc::new(MemoryStore::new());
        let business_id = Uuid::new_v4();
        let n = stored_row(&store, business_id, Channel::Sms).await;
        let mut session = session(business_id, store);

        assert!(session.handle_event(&FeedEvent::Inserted(n)).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn dismissed_ids_are_skipped() {
        let store = Arc::new(MemoryStore::new());
        let business_id = Uuid::new_v4();
        let n = stored_row(&store, business_id, Channel::InApp).await;
        let mut session = session(business_id, store);

        session.dismiss(n.id).await;
        assert!(session.handle_event(&FeedEvent::Inserted(n)).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn redundant_lifecycle_calls_are_safe() {
        let store = Arc::new(MemoryStore::new());
        let business_id = Uuid::new_v4();
        let n = stored_row(&store, business_id, Channel::InApp).await;
        let mut session = session(business_id, Arc::clone(&store));

        let toast = session
            .handle_event(&FeedEvent::Inserted(n.clone()))
            .await
            .unwrap();
        session.toast_expired(toast.notification_id).await;
        session.dismiss(toast.notification_id).await;

        let stored = store.get(business_id, n.id).await.unwrap().unwrap();
        assert_eq!(stored.status, NotificationStatus::Read);
    }

    #[tokio::test(start_paused = true)]
    async fn other_tenants_events_are_ignored() {
        let store = Arc::new(MemoryStore::new());
        let business_id = Uuid::new_v4();
        let other = stored_row(&store, Uuid::new_v4(), Channel::InApp).await;
        let mut session = session(business_id, store);

        assert!(
            session
                .handle_event(&FeedEvent::Inserted(other))
                .await
                .is_none()
        );
    }
}
