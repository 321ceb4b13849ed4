//! Email channel: no transport integrated yet.

use async_trait::async_trait;

use pulse_entity::Channel;

use crate::error::ChannelError;
use crate::sender::{ChannelSender, Delivery, DeliveryContext};

/// Sender for the `email` channel.
///
/// Deterministically fails with the stable `Unimplemented` error until an
/// email transport is integrated, so callers can tell this apart from a
/// transient failure.
#[derive(Debug, Default)]
pub struct EmailSender;

impl EmailSender {
    /// Create the sender.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ChannelSender for EmailSender {
    fn channel(&self) -> Channel {
        Channel::Email
    }

    async fn send(&self, _ctx: &DeliveryContext) -> Result<Delivery, ChannelError> {
        Err(ChannelError::Unimplemented)
    }
}
