//! The dispatch engine: fan-out, delivery, and per-channel outcome
//! recording.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use pulse_core::error::AppError;
use pulse_core::result::AppResult;
use pulse_database::{InsertOutcome, NotificationStore};
use pulse_entity::{Channel, Notification};
use pulse_channels::{ChannelRegistry, DeliveryContext};
use pulse_realtime::NotificationFeed;

use crate::outcome::{ChannelResult, DispatchOutcome};
use crate::request::DispatchRequest;

/// Turns one logical event into per-channel rows and drives delivery.
///
/// All collaborators are injected at construction; the engine holds no
/// other state, so concurrent dispatches only contend inside the store.
pub struct DispatchEngine {
    store: Arc<dyn NotificationStore>,
    senders: Arc<ChannelRegistry>,
    feed: Arc<NotificationFeed>,
}

impl std::fmt::Debug for DispatchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchEngine").finish()
    }
}

impl DispatchEngine {
    /// Create the engine with its store, senders, and insertion feed.
    pub fn new(
        store: Arc<dyn NotificationStore>,
        senders: Arc<ChannelRegistry>,
        feed: Arc<NotificationFeed>,
    ) -> Self {
        Self {
            store,
            senders,
            feed,
        }
    }

    /// Dispatch one logical event.
    ///
    /// Channels are processed in request order. Each channel persists its
    /// own row and records its own outcome; one channel failing — at the
    /// write or at the send — never prevents the siblings from being
    /// attempted, and nothing is ever rolled back.
    pub async fn dispatch(&self, mut request: DispatchRequest) -> AppResult<DispatchOutcome> {
        request.validate()?;

        let mut results = Vec::with_capacity(request.channels.len());
        for channel in request.channels.clone() {
            results.push(self.dispatch_channel(&request, channel).await);
        }

        let outcome = DispatchOutcome { results };
        tracing::info!(
            business_id = %request.business_id,
            kind = %request.kind,
            channels = request.channels.len(),
            status = ?outcome.status(),
            "dispatch complete"
        );
        Ok(outcome)
    }

    async fn dispatch_channel(&self, request: &DispatchRequest, channel: Channel) -> ChannelResult {
        let row = Notification::pending(
            request.business_id,
            request.kind,
            channel,
            request.priority,
            request.title.clone(),
            request.message.clone(),
            request.metadata.clone(),
            request.scheduled_for,
        );

        match self.store.insert(&row).await {
            Ok(InsertOutcome::Stored) => {}
            Ok(InsertOutcome::LoggedFallback) => {
                // Degraded write: the payload is in the event log, there is
                // no row to deliver or transition. The channel still counts
                // as succeeded.
                return ChannelResult::ok(channel, row.id);
            }
            Err(e) => {
                tracing::error!(channel = %channel, error = %e, "notification write failed");
                return ChannelResult::write_failed(channel, e.message);
            }
        }

        self.feed.publish(&row);

        if row.is_deferred(Utc::now()) {
            // Stays pending until the scheduled re-drive; nothing to send now.
            return ChannelResult::ok(channel, row.id);
        }

        self.deliver(&row).await
    }

    /// Re-drive a still-pending row whose scheduled time has come due.
    ///
    /// The external collaborator interface for deferred delivery: the cron
    /// scan calls this, and so may any other trigger. A row that already
    /// left `pending` is a conflict, not re-sent.
    pub async fn redeliver(&self, business_id: Uuid, notification_id: Uuid) -> AppResult<ChannelResult> {
        let row = self
            .store
            .get(business_id, notification_id)
            .await?
            .ok_or_else(|| AppError::not_found("notification not found"))?;

        if !row.status.is_deliverable() {
            return Err(AppError::conflict(format!(
                "notification is {}, not pending",
                row.status
            )));
        }
        if row.is_deferred(Utc::now()) {
            return Err(AppError::conflict("notification is not yet due"));
        }

        Ok(self.deliver(&row).await)
    }

    async fn deliver(&self, row: &Notification) -> ChannelResult {
        let Some(sender) = self.senders.get(row.channel) else {
            let error = format!("no sender registered for channel {}", row.channel);
            self.record_failure(row, &error).await;
            return ChannelResult::failed(row.channel, row.id, error);
        };

        let ctx = DeliveryContext {
            business_id: row.business_id,
            notification_id: row.id,
            title: row.title.clone(),
            message: row.message.clone(),
            metadata: row.metadata.clone(),
        };

        match sender.send(&ctx).await {
            Ok(delivery) => {
                match self
                    .store
                    .mark_sent(row.business_id, row.id, Utc::now())
                    .await
                {
                    Ok(true) => {}
                    Ok(false) => {
                        tracing::warn!(
                            notification_id = %row.id,
                            "row left pending before sent could be recorded"
                        );
                    }
                    Err(e) => {
                        tracing::error!(
                            notification_id = %row.id,
                            error = %e,
                            "failed to record sent status"
                        );
                    }
                }
                tracing::debug!(
                    notification_id = %row.id,
                    channel = %row.channel,
                    delivery_ref = delivery.delivery_ref.as_deref().unwrap_or("-"),
                    "channel delivery succeeded"
                );
                ChannelResult::ok(row.channel, row.id)
            }
            Err(e) => {
                let error = e.to_string();
                self.record_failure(row, &error).await;
                ChannelResult::failed(row.channel, row.id, error)
            }
        }
    }

    async fn record_failure(&self, row: &Notification, error: &str) {
        match self.store.mark_failed(row.business_id, row.id, error).await {
            Ok(_) => {
                tracing::warn!(
                    notification_id = %row.id,
                    channel = %row.channel,
                    error,
                    "channel delivery failed"
                );
            }
            Err(e) => {
                tracing::error!(
                    notification_id = %row.id,
                    error = %e,
                    "failed to record delivery failure"
                );
            }
        }
    }
}
