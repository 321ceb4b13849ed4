//! Validated dispatch requests.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use pulse_core::error::AppError;
use pulse_entity::{Channel, NotificationType, Priority};

/// One logical business event to be fanned out over 1..N channels.
///
/// The duck-typed `channel | channel[]` HTTP input is normalized into the
/// `channels` list at the API boundary; internally it is always a sequence,
/// expanded in request order.
#[derive(Debug, Clone)]
pub struct DispatchRequest {
    /// Owning tenant.
    pub business_id: Uuid,
    /// The business event type.
    pub kind: NotificationType,
    /// Display title.
    pub title: String,
    /// Display body.
    pub message: String,
    /// Target channels in request order. Empty defaults to `[in_app]`.
    pub channels: Vec<Channel>,
    /// Priority applied to every produced row.
    pub priority: Priority,
    /// Caller-supplied context bag.
    pub metadata: serde_json::Value,
    /// Defer delivery until this instant when strictly in the future.
    pub scheduled_for: Option<DateTime<Utc>>,
}

impl DispatchRequest {
    /// Create a request with defaults for the optional fields.
    pub fn new(
        business_id: Uuid,
        kind: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            business_id,
            kind,
            title: title.into(),
            message: message.into(),
            channels: Vec::new(),
            priority: Priority::default(),
            metadata: serde_json::json!({}),
            scheduled_for: None,
        }
    }

    /// Check required fields and normalize the channel list.
    ///
    /// Fails with a validation error before anything is persisted.
    pub fn validate(&mut self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::validation("title is required"));
        }
        if self.message.trim().is_empty() {
            return Err(AppError::validation("message is required"));
        }
        if self.business_id.is_nil() {
            return Err(AppError::validation("businessId is required"));
        }
        if self.channels.is_empty() {
            self.channels.push(Channel::InApp);
        }
        Ok(())
    }
}
