//! Channel delivery errors.
//!
//! These are per-channel outcomes, not application errors: the dispatch
//! engine records them on the row and in the aggregated result, and they
//! never escalate to abort a request. Display strings are stable so
//! callers can distinguish the failure classes.

use thiserror::Error;

/// A failed delivery attempt on a single channel.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChannelError {
    /// The tenant has no destination on file for this channel.
    #[error("No phone number on file")]
    NoDestination,
    /// The channel's gateway credentials are absent.
    #[error("SMS gateway not configured")]
    NotConfigured,
    /// The gateway call itself errored.
    #[error("Gateway error: {0}")]
    Gateway(String),
    /// The channel has no transport integrated. Deterministic, and
    /// distinguishable from a transient failure.
    #[error("Email channel not implemented")]
    Unimplemented,
    /// Failed looking up the tenant's contact routing info.
    #[error("Contact lookup failed: {0}")]
    Directory(String),
}

impl ChannelError {
    /// Whether retrying could ever help. `Unimplemented` and
    /// `NoDestination` are deterministic.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Gateway(_) | Self::Directory(_))
    }
}
