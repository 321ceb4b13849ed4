//! Notification lifecycle status and its legal transitions.

use crate::text::text_enum;

text_enum! {
    /// Lifecycle state of a single notification row.
    ///
    /// `pending` is the sole initial state, `read` the sole terminal state.
    /// Status is monotonic: once `read`, a row never regresses.
    pub enum NotificationStatus {
        /// Persisted, delivery not yet attempted (or deferred).
        Pending => "pending",
        /// The channel sender reported success.
        Sent => "sent",
        /// The channel sender reported failure. Not retried in place.
        Failed => "failed",
        /// Acknowledged by the consumer. Terminal.
        Read => "read",
    }
}

impl NotificationStatus {
    /// Whether a transition from `self` to `to` is legal.
    ///
    /// `failed` rows cannot go back to `sent`; a fresh dispatch creates a
    /// new row instead. Any non-read state can be marked `read`, including
    /// `failed` (acknowledging an undelivered notification).
    pub fn can_transition(&self, to: NotificationStatus) -> bool {
        use NotificationStatus::*;
        matches!(
            (self, to),
            (Pending, Sent) | (Pending, Failed) | (Pending, Read) | (Sent, Read) | (Failed, Read)
        )
    }

    /// Whether this row counts as unread for the bell aggregator.
    pub fn is_unread(&self) -> bool {
        matches!(self, Self::Pending | Self::Sent)
    }

    /// Whether the row is still awaiting a delivery attempt.
    pub fn is_deliverable(&self) -> bool {
        matches!(self, Self::Pending)
    }
}
