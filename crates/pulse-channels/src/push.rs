//! Push channel: best-effort, success even without a wired transport.

use async_trait::async_trait;

use pulse_core::config::channels::PushConfig;
use pulse_entity::Channel;

use crate::error::ChannelError;
use crate::sender::{ChannelSender, Delivery, DeliveryContext};

/// Sender for the `push` channel.
///
/// With no transport configured the content is still queued for later pull
/// (the persisted row serves it), so the send reports success. "Not yet
/// wired up" is not a delivery failure.
#[derive(Debug)]
pub struct PushSender {
    config: PushConfig,
}

impl PushSender {
    /// Create the sender from configuration.
    pub fn new(config: PushConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ChannelSender for PushSender {
    fn channel(&self) -> Channel {
        Channel::Push
    }

    async fn send(&self, ctx: &DeliveryContext) -> Result<Delivery, ChannelError> {
        if !self.config.enabled {
            tracing::debug!(
                business_id = %ctx.business_id,
                notification_id = %ctx.notification_id,
                "push transport not configured, content queued for pull"
            );
            return Ok(Delivery::default());
        }

        // TODO: wire the web-push transport once device subscriptions land.
        tracing::debug!(
            business_id = %ctx.business_id,
            notification_id = %ctx.notification_id,
            "push notification queued"
        );
        Ok(Delivery::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn ctx() -> DeliveryContext {
        DeliveryContext {
            business_id: Uuid::new_v4(),
            notification_id: Uuid::new_v4(),
            title: "t".into(),
            message: "m".into(),
            metadata: serde_json::json!({}),
        }
    }

    #[tokio::test]
    async fn unconfigured_transport_still_reports_success() {
        let sender = PushSender::new(PushConfig { enabled: false });
        assert!(sender.send(&ctx()).await.is_ok());
    }
}
