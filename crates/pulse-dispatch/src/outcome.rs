//! Per-channel results and their aggregation.

use serde::Serialize;
use uuid::Uuid;

use pulse_entity::Channel;

/// The outcome of one channel of a dispatch.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelResult {
    /// The channel attempted.
    pub channel: Channel,
    /// Whether this channel's row was persisted and (if due) delivered.
    pub success: bool,
    /// The persisted row id, absent when the write itself failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_id: Option<Uuid>,
    /// The failure message, absent on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChannelResult {
    /// A successful channel outcome.
    pub fn ok(channel: Channel, notification_id: Uuid) -> Self {
        Self {
            channel,
            success: true,
            notification_id: Some(notification_id),
            error: None,
        }
    }

    /// A failed channel outcome for a persisted row.
    pub fn failed(channel: Channel, notification_id: Uuid, error: impl Into<String>) -> Self {
        Self {
            channel,
            success: false,
            notification_id: Some(notification_id),
            error: Some(error.into()),
        }
    }

    /// A failed channel outcome where not even the row exists.
    pub fn write_failed(channel: Channel, error: impl Into<String>) -> Self {
        Self {
            channel,
            success: false,
            notification_id: None,
            error: Some(error.into()),
        }
    }
}

/// How the fan-out went overall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStatus {
    /// Every channel succeeded.
    AllSucceeded,
    /// Some channels succeeded, some failed.
    Partial,
    /// Every channel failed.
    NoneSucceeded,
}

/// The aggregated result of one dispatch request.
///
/// A partial failure is not an error: each channel's outcome is
/// independent, and a persisted row is never rolled back because a sibling
/// channel failed.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    /// Per-channel results in request order.
    pub results: Vec<ChannelResult>,
}

impl DispatchOutcome {
    /// Aggregate the per-channel results.
    pub fn status(&self) -> DispatchStatus {
        let succeeded = self.results.iter().filter(|r| r.success).count();
        if succeeded == self.results.len() {
            DispatchStatus::AllSucceeded
        } else if succeeded == 0 {
            DispatchStatus::NoneSucceeded
        } else {
            DispatchStatus::Partial
        }
    }
}
