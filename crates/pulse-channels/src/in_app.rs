//! In-app channel: delivery is the persisted row itself.

use async_trait::async_trait;

use pulse_entity::Channel;

use crate::error::ChannelError;
use crate::sender::{ChannelSender, Delivery, DeliveryContext};

/// Sender for the `in_app` channel. Always succeeds: there is no external
/// call, the persisted row is the delivery.
#[derive(Debug, Default)]
pub struct InAppSender;

impl InAppSender {
    /// Create the sender.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ChannelSender for InAppSender {
    fn channel(&self) -> Channel {
        Channel::InApp
    }

    async fn send(&self, ctx: &DeliveryContext) -> Result<Delivery, ChannelError> {
        tracing::debug!(
            business_id = %ctx.business_id,
            notification_id = %ctx.notification_id,
            "in-app notification delivered via persisted row"
        );
        Ok(Delivery::default())
    }
}
