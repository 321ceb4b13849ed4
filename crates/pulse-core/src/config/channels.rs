//! Outbound delivery channel configuration.

use serde::{Deserialize, Serialize};

/// Settings for the concrete channel senders.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChannelsConfig {
    /// SMS gateway settings.
    #[serde(default)]
    pub sms: SmsGatewayConfig,
    /// Push transport settings.
    #[serde(default)]
    pub push: PushConfig,
}

/// SMS gateway credentials and limits.
///
/// When `account_sid`/`auth_token` are empty the sender reports a
/// distinguishable "not configured" failure rather than attempting a call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsGatewayConfig {
    /// Gateway API base URL.
    #[serde(default = "default_sms_url")]
    pub api_url: String,
    /// Gateway account identifier.
    #[serde(default)]
    pub account_sid: String,
    /// Gateway auth token.
    #[serde(default)]
    pub auth_token: String,
    /// Sending phone number.
    #[serde(default)]
    pub from_number: String,
    /// Maximum message body length accepted by the gateway.
    #[serde(default = "default_sms_max_length")]
    pub max_body_length: usize,
}

/// Push transport settings.
///
/// Push delivery is best-effort: with no transport configured, content is
/// still queued for later pull and the send reports success.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PushConfig {
    /// Whether an actual push transport is wired up.
    #[serde(default)]
    pub enabled: bool,
}

impl Default for SmsGatewayConfig {
    fn default() -> Self {
        Self {
            api_url: default_sms_url(),
            account_sid: String::new(),
            auth_token: String::new(),
            from_number: String::new(),
            max_body_length: default_sms_max_length(),
        }
    }
}

fn default_sms_url() -> String {
    "https://api.twilio.com/2010-04-01".to_string()
}

fn default_sms_max_length() -> usize {
    1600
}
