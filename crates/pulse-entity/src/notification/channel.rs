//! Delivery channel enumeration.

use crate::text::text_enum;

text_enum! {
    /// A delivery medium. One notification row carries exactly one channel.
    pub enum Channel {
        /// Delivered by the persisted row itself.
        InApp => "in_app",
        /// Text message via the SMS gateway.
        Sms => "sms",
        /// Mobile/desktop push.
        Push => "push",
        /// Email (no transport integrated yet).
        Email => "email",
    }
}

impl Channel {
    /// Whether rows on this channel are surfaced by the live feed.
    pub fn is_live(&self) -> bool {
        matches!(self, Self::InApp | Self::Push)
    }
}
