//! Request DTOs with validation.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use pulse_core::error::AppError;
use pulse_core::result::AppResult;
use pulse_dispatch::DispatchRequest;
use pulse_entity::{Channel, NotificationType, Priority};

/// Parse a wire string into one of the closed text enums, turning both a
/// wrong JSON type and an unknown value into a validation error.
fn parse_text<T>(value: &serde_json::Value, field: &str) -> AppResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let text = value
        .as_str()
        .ok_or_else(|| AppError::validation(format!("{field} must be a string")))?;
    text.parse::<T>()
        .map_err(|e| AppError::validation(e.to_string()))
}

/// Normalize the `channel | channel[]` duck-typed input to a channel list.
fn parse_channels(value: &serde_json::Value) -> AppResult<Vec<Channel>> {
    match value {
        serde_json::Value::String(_) => Ok(vec![parse_text(value, "channel")?]),
        serde_json::Value::Array(items) => {
            items.iter().map(|v| parse_text(v, "channel")).collect()
        }
        _ => Err(AppError::validation(
            "channel must be a string or an array of strings",
        )),
    }
}

/// POST /notifications/send body.
///
/// Required fields are optional at the serde layer, and the enum-valued
/// fields are captured as raw JSON, so a missing field or an unknown wire
/// string surfaces as a 400 validation error rather than a
/// deserialization rejection.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationRequest {
    /// Owning tenant.
    pub business_id: Option<Uuid>,
    /// Event type.
    #[serde(rename = "type")]
    pub kind: Option<serde_json::Value>,
    /// Display title.
    #[validate(length(min = 1, message = "title is required"))]
    pub title: Option<String>,
    /// Display body.
    #[validate(length(min = 1, message = "message is required"))]
    pub message: Option<String>,
    /// Target channel(s); defaults to in_app when omitted.
    #[serde(default, alias = "channels")]
    pub channel: Option<serde_json::Value>,
    /// Priority; defaults to medium.
    #[serde(default)]
    pub priority: Option<serde_json::Value>,
    /// Caller-supplied context bag.
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    /// Deferred delivery timestamp.
    #[serde(default)]
    pub scheduled_for: Option<DateTime<Utc>>,
}

impl SendNotificationRequest {
    /// Validate required fields and convert into a dispatch request.
    pub fn into_dispatch_request(self) -> AppResult<DispatchRequest> {
        self.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;

        let business_id = self
            .business_id
            .ok_or_else(|| AppError::validation("businessId is required"))?;
        let kind: NotificationType = match &self.kind {
            Some(value) => parse_text(value, "type")?,
            None => return Err(AppError::validation("type is required")),
        };
        let title = self
            .title
            .ok_or_else(|| AppError::validation("title is required"))?;
        let message = self
            .message
            .ok_or_else(|| AppError::validation("message is required"))?;

        let mut request = DispatchRequest::new(business_id, kind, title, message);
        if let Some(value) = &self.channel {
            request.channels = parse_channels(value)?;
        }
        if let Some(value) = &self.priority {
            request.priority = parse_text::<Priority>(value, "priority")?;
        }
        if let Some(metadata) = self.metadata {
            request.metadata = metadata;
        }
        request.scheduled_for = self.scheduled_for;
        Ok(request)
    }
}

/// GET /notifications query parameters.
///
/// `limit`/`offset` are accepted as loose numerics and truncated toward
/// zero, matching what lenient HTTP clients actually send.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNotificationsQuery {
    /// Owning tenant.
    pub business_id: Uuid,
    /// Only rows with `status ∈ {pending, sent}`.
    #[serde(default)]
    pub unread_only: Option<bool>,
    /// Page size, default 20.
    #[serde(default)]
    pub limit: Option<f64>,
    /// Page offset, default 0.
    #[serde(default)]
    pub offset: Option<f64>,
    /// Restrict to a single event type.
    #[serde(default, rename = "type")]
    pub kind: Option<NotificationType>,
}

/// Bulk state transition named by a PATCH /notifications body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationAction {
    /// Mark the given rows read.
    MarkRead,
    /// Mark every pending/sent row read.
    MarkAllRead,
    /// Mark read plus the soft-delete marker.
    Dismiss,
}

/// PATCH /notifications body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNotificationsRequest {
    /// Owning tenant.
    pub business_id: Uuid,
    /// Which transition to apply.
    pub action: NotificationAction,
    /// Single-row form.
    #[serde(default)]
    pub notification_id: Option<Uuid>,
    /// Multi-row form; takes precedence when both are present.
    #[serde(default)]
    pub notification_ids: Option<Vec<Uuid>>,
}

impl UpdateNotificationsRequest {
    /// The targeted row ids, possibly empty.
    pub fn ids(&self) -> Vec<Uuid> {
        match (&self.notification_ids, self.notification_id) {
            (Some(ids), _) => ids.clone(),
            (None, Some(id)) => vec![id],
            (None, None) => Vec::new(),
        }
    }
}

/// DELETE /notifications query parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeQuery {
    /// Owning tenant.
    pub business_id: Uuid,
    /// Retention window override, default 30 days.
    #[serde(default)]
    pub older_than_days: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(extra: serde_json::Value) -> SendNotificationRequest {
        let mut base = serde_json::json!({
            "businessId": Uuid::new_v4(),
            "type": "new_lead",
            "title": "New lead",
            "message": "Jordan asked for a quote",
        });
        base.as_object_mut()
            .unwrap()
            .extend(extra.as_object().unwrap().clone());
        serde_json::from_value(base).unwrap()
    }

    #[test]
    fn channel_accepts_scalar_and_list_forms() {
        let scalar = body(serde_json::json!({ "channel": "sms" }));
        assert_eq!(
            scalar.into_dispatch_request().unwrap().channels,
            vec![Channel::Sms]
        );

        let list = body(serde_json::json!({ "channels": ["in_app", "push"] }));
        assert_eq!(
            list.into_dispatch_request().unwrap().channels,
            vec![Channel::InApp, Channel::Push]
        );
    }

    #[test]
    fn unknown_enum_strings_fail_validation_not_deserialization() {
        let err = body(serde_json::json!({ "type": "telegram_ping" }))
            .into_dispatch_request()
            .unwrap_err();
        assert_eq!(err.kind, pulse_core::error::ErrorKind::Validation);

        let err = body(serde_json::json!({ "channel": ["in_app", "fax"] }))
            .into_dispatch_request()
            .unwrap_err();
        assert_eq!(err.kind, pulse_core::error::ErrorKind::Validation);

        let err = body(serde_json::json!({ "priority": 3 }))
            .into_dispatch_request()
            .unwrap_err();
        assert_eq!(err.kind, pulse_core::error::ErrorKind::Validation);
    }

    #[test]
    fn missing_required_fields_fail_validation_not_deserialization() {
        let req: SendNotificationRequest = serde_json::from_value(serde_json::json!({})).unwrap();
        let err = req.into_dispatch_request().unwrap_err();
        assert_eq!(err.kind, pulse_core::error::ErrorKind::Validation);
    }

    #[test]
    fn ids_prefers_the_list_form() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let req = UpdateNotificationsRequest {
            business_id: Uuid::new_v4(),
            action: NotificationAction::MarkRead,
            notification_id: Some(a),
            notification_ids: Some(vec![b]),
        };
        assert_eq!(req.ids(), vec![b]);
    }
}
