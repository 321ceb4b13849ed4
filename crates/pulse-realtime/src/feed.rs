//! Per-tenant insertion-event feed.
//!
//! The dispatch engine publishes every stored row here; live sessions
//! subscribe to their tenant's channel. Single-node in-memory transport
//! built on tokio broadcast channels.

use dashmap::DashMap;
use tokio::sync::broadcast;
use uuid::Uuid;

use pulse_entity::Notification;

/// An event observed on the feed.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// A notification row was just persisted.
    Inserted(Notification),
}

/// Per-tenant pub/sub for insertion events.
#[derive(Debug)]
pub struct NotificationFeed {
    /// business_id → broadcast sender
    channels: DashMap<Uuid, broadcast::Sender<FeedEvent>>,
    /// Buffer size for each tenant channel.
    buffer_size: usize,
}

impl NotificationFeed {
    /// Create a new feed.
    pub fn new(buffer_size: usize) -> Self {
        Self {
            channels: DashMap::new(),
            buffer_size,
        }
    }

    /// Publish an insertion event to the owning tenant's subscribers.
    ///
    /// A tenant with no active subscription drops the event; the polling
    /// fallback covers those clients.
    pub fn publish(&self, notification: &Notification) {
        if let Some(tx) = self.channels.get(&notification.business_id) {
            let _ = tx.send(FeedEvent::Inserted(notification.clone()));
        }
    }

    /// Subscribe to a tenant's insertion events.
    pub fn subscribe(&self, business_id: Uuid) -> broadcast::Receiver<FeedEvent> {
        self.channels
            .entry(business_id)
            .or_insert_with(|| broadcast::channel(self.buffer_size).0)
            .subscribe()
    }

    /// Drop a tenant's channel once its last subscriber is gone.
    pub fn prune(&self, business_id: Uuid) {
        self.channels
            .remove_if(&business_id, |_, tx| tx.receiver_count() == 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_entity::{Channel, NotificationType, Priority};

    fn row(business_id: Uuid) -> Notification {
        Notification::pending(
            business_id,
            NotificationType::PaymentReceived,
            Channel::InApp,
            Priority::Medium,
            "t",
            "m",
            serde_json::json!({}),
            None,
        )
    }

    #[tokio::test]
    async fn subscriber_receives_own_tenant_events_only() {
        let feed = NotificationFeed::new(16);
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let mut rx_a = feed.subscribe(a);
        let _rx_b = feed.subscribe(b);

        feed.publish(&row(b));
        feed.publish(&row(a));

        let FeedEvent::Inserted(n) = rx_a.recv().await.unwrap();
        assert_eq!(n.business_id, a);
        assert!(rx_a.try_recv().is_err());
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_dropped() {
        let feed = NotificationFeed::new(16);
        feed.publish(&row(Uuid::new_v4()));
    }
}
