//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::channel::Channel;
use super::kind::NotificationType;
use super::priority::Priority;
use super::status::NotificationStatus;

/// A single per-channel notification row.
///
/// One logical business event requesting N channels produces N independent
/// rows, each with its own lifecycle. Every read and write is scoped by
/// `business_id`; no operation crosses tenants.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier. Assigned at creation, immutable.
    pub id: Uuid,
    /// Owning tenant.
    pub business_id: Uuid,
    /// The business event type. Serialized as `type` on the wire.
    #[serde(rename = "type")]
    pub kind: NotificationType,
    /// The one delivery channel for this row.
    pub channel: Channel,
    /// Priority level. Immutable after creation.
    pub priority: Priority,
    /// Lifecycle status.
    pub status: NotificationStatus,
    /// Display title. Opaque to this service.
    pub title: String,
    /// Display body. Opaque to this service.
    pub message: String,
    /// Caller-supplied context bag. Only ever added to, never interpreted
    /// except for the `dismissed` soft-delete marker.
    pub metadata: serde_json::Value,
    /// Optional deferred-delivery timestamp. While in the future, the row
    /// stays `pending` and the send step is skipped.
    pub scheduled_for: Option<DateTime<Utc>>,
    /// Set exactly once on the `pending → sent` transition.
    pub sent_at: Option<DateTime<Utc>>,
    /// Set exactly once on the transition to `read`.
    pub read_at: Option<DateTime<Utc>>,
    /// Set exactly once on the `pending → failed` transition.
    pub error: Option<String>,
    /// Set at persistence, immutable.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Build a fresh `pending` row for one channel of a dispatch request.
    #[allow(clippy::too_many_arguments)]
    pub fn pending(
        business_id: Uuid,
        kind: NotificationType,
        channel: Channel,
        priority: Priority,
        title: impl Into<String>,
        message: impl Into<String>,
        metadata: serde_json::Value,
        scheduled_for: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            business_id,
            kind,
            channel,
            priority,
            status: NotificationStatus::Pending,
            title: title.into(),
            message: message.into(),
            metadata,
            scheduled_for,
            sent_at: None,
            read_at: None,
            error: None,
            created_at: Utc::now(),
        }
    }

    /// Whether this row counts toward the unread badge.
    pub fn is_unread(&self) -> bool {
        self.status.is_unread()
    }

    /// Whether the row carries the soft-delete marker.
    pub fn is_dismissed(&self) -> bool {
        self.metadata
            .get("dismissed")
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    /// Whether delivery is deferred to a future instant as of `now`.
    pub fn is_deferred(&self, now: DateTime<Utc>) -> bool {
        self.scheduled_for.map(|at| at > now).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Notification {
        Notification::pending(
            Uuid::new_v4(),
            NotificationType::NewLead,
            Channel::InApp,
            Priority::High,
            "New lead",
            "Jordan asked for a quote",
            serde_json::json!({}),
            None,
        )
    }

    #[test]
    fn fresh_row_is_pending_and_unread() {
        let n = sample();
        assert_eq!(n.status, NotificationStatus::Pending);
        assert!(n.is_unread());
        assert!(!n.is_dismissed());
    }

    #[test]
    fn dismissed_marker_is_read_from_metadata() {
        let mut n = sample();
        n.metadata = serde_json::json!({ "dismissed": true });
        assert!(n.is_dismissed());
        n.metadata = serde_json::json!({ "dismissed": "yes" });
        assert!(!n.is_dismissed());
    }

    #[test]
    fn serializes_kind_under_the_type_key() {
        let n = sample();
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["type"], "new_lead");
        assert!(json.get("kind").is_none());
        let back: Notification = serde_json::from_value(json).unwrap();
        assert_eq!(back.kind, NotificationType::NewLead);
    }

    #[test]
    fn deferral_is_strictly_future() {
        let mut n = sample();
        let now = Utc::now();
        assert!(!n.is_deferred(now));
        n.scheduled_for = Some(now + chrono::Duration::minutes(5));
        assert!(n.is_deferred(now));
        n.scheduled_for = Some(now);
        assert!(!n.is_deferred(now));
    }
}
