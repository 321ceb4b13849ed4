//! The uniform channel sender capability.

use async_trait::async_trait;
use uuid::Uuid;

use pulse_entity::Channel;

use crate::error::ChannelError;

/// What a sender needs to attempt one delivery.
///
/// Destination routing info (phone number, device token) is resolved by the
/// sender itself through its collaborators; the context only identifies the
/// tenant and carries the display payload.
#[derive(Debug, Clone)]
pub struct DeliveryContext {
    /// Owning tenant.
    pub business_id: Uuid,
    /// The persisted row this attempt belongs to.
    pub notification_id: Uuid,
    /// Display title.
    pub title: String,
    /// Display body.
    pub message: String,
    /// Caller-supplied context bag.
    pub metadata: serde_json::Value,
}

/// A successful delivery attempt.
#[derive(Debug, Clone, Default)]
pub struct Delivery {
    /// Transport-side reference (gateway message sid etc.), when one exists.
    pub delivery_ref: Option<String>,
}

/// One implementation per channel; uniform contract: attempt delivery,
/// return success or a distinguishable failure.
///
/// Sends are at-most-once best-effort with recorded outcome; no timeout is
/// imposed here, implementations bound their own latency.
#[async_trait]
pub trait ChannelSender: Send + Sync + std::fmt::Debug + 'static {
    /// The channel this sender serves.
    fn channel(&self) -> Channel;

    /// Attempt one delivery.
    async fn send(&self, ctx: &DeliveryContext) -> Result<Delivery, ChannelError>;
}

/// Lookup table of sender implementations keyed by channel.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    senders: Vec<std::sync::Arc<dyn ChannelSender>>,
}

impl ChannelRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sender, replacing any previous one for the same channel.
    pub fn register(mut self, sender: std::sync::Arc<dyn ChannelSender>) -> Self {
        self.senders.retain(|s| s.channel() != sender.channel());
        self.senders.push(sender);
        self
    }

    /// Look up the sender for a channel.
    pub fn get(&self, channel: Channel) -> Option<&std::sync::Arc<dyn ChannelSender>> {
        self.senders.iter().find(|s| s.channel() == channel)
    }
}
