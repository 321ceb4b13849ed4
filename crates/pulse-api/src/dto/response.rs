//! Response DTOs.

use serde::Serialize;

use pulse_dispatch::{ChannelResult, DispatchOutcome, DispatchStatus};
use pulse_entity::Notification;

/// POST /notifications/send response body.
#[derive(Debug, Clone, Serialize)]
pub struct SendNotificationResponse {
    /// Whether every channel succeeded.
    pub success: bool,
    /// Per-channel results in request order.
    pub results: Vec<ChannelResult>,
    /// Human-readable summary.
    pub message: String,
}

impl SendNotificationResponse {
    /// Build the body from a dispatch outcome.
    pub fn from_outcome(outcome: DispatchOutcome) -> Self {
        let (success, message) = match outcome.status() {
            DispatchStatus::AllSucceeded => (true, "All channels delivered"),
            DispatchStatus::Partial => (false, "Some channels failed"),
            DispatchStatus::NoneSucceeded => (false, "All channels failed"),
        };
        Self {
            success,
            results: outcome.results,
            message: message.to_string(),
        }
    }
}

/// Pagination summary on list responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Page size applied.
    pub limit: i64,
    /// Offset applied.
    pub offset: i64,
    /// Whether rows remain past this window.
    pub has_more: bool,
}

/// GET /notifications response body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNotificationsResponse {
    /// The page of rows, newest first.
    pub notifications: Vec<Notification>,
    /// Total rows matching the filter.
    pub total: i64,
    /// Tenant-wide unread count.
    pub unread_count: i64,
    /// Page window summary.
    pub pagination: PaginationMeta,
}

/// Bulk-update and purge response body.
#[derive(Debug, Clone, Serialize)]
pub struct CountResponse {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Rows affected.
    pub count: u64,
}

/// GET /health response body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Crate version.
    pub version: String,
}
