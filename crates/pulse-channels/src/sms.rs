//! SMS channel: gateway delivery via the tenant's phone number on file.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use pulse_core::config::channels::SmsGatewayConfig;
use pulse_entity::Channel;

use crate::directory::ContactDirectory;
use crate::error::ChannelError;
use crate::sender::{ChannelSender, Delivery, DeliveryContext};

/// Successful gateway response body.
#[derive(Debug, Deserialize)]
struct GatewayResponse {
    sid: Option<String>,
}

/// Sender for the `sms` channel.
///
/// Fails distinguishably when the business has no phone on file, when the
/// gateway credentials are absent, and when the gateway call itself errors.
/// Long bodies are truncated to the gateway maximum; splitting into
/// segments is a caller concern.
#[derive(Debug)]
pub struct SmsSender {
    config: SmsGatewayConfig,
    directory: Arc<dyn ContactDirectory>,
    client: reqwest::Client,
}

impl SmsSender {
    /// Create the sender from configuration and the contact directory.
    pub fn new(config: SmsGatewayConfig, directory: Arc<dyn ContactDirectory>) -> Self {
        Self {
            config,
            directory,
            client: reqwest::Client::new(),
        }
    }

    fn is_configured(&self) -> bool {
        !self.config.account_sid.is_empty()
            && !self.config.auth_token.is_empty()
            && !self.config.from_number.is_empty()
    }

    /// Compose the SMS body, truncated to the gateway's maximum length.
    fn body(&self, ctx: &DeliveryContext) -> String {
        let full = format!("{}: {}", ctx.title, ctx.message);
        if full.chars().count() <= self.config.max_body_length {
            full
        } else {
            full.chars().take(self.config.max_body_length).collect()
        }
    }
}

#[async_trait]
impl ChannelSender for SmsSender {
    fn channel(&self) -> Channel {
        Channel::Sms
    }

    async fn send(&self, ctx: &DeliveryContext) -> Result<Delivery, ChannelError> {
        let to = self
            .directory
            .phone_number(ctx.business_id)
            .await?
            .ok_or(ChannelError::NoDestination)?;

        if !self.is_configured() {
            return Err(ChannelError::NotConfigured);
        }

        let url = format!(
            "{}/Accounts/{}/Messages.json",
            self.config.api_url, self.config.account_sid
        );

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[
                ("To", to.as_str()),
                ("From", self.config.from_number.as_str()),
                ("Body", self.body(ctx).as_str()),
            ])
            .send()
            .await
            .map_err(|e| ChannelError::Gateway(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(ChannelError::Gateway(format!("{status}: {detail}")));
        }

        let parsed: GatewayResponse = response
            .json()
            .await
            .map_err(|e| ChannelError::Gateway(e.to_string()))?;

        tracing::info!(
            business_id = %ctx.business_id,
            notification_id = %ctx.notification_id,
            sid = parsed.sid.as_deref().unwrap_or("-"),
            "SMS accepted by gateway"
        );
        Ok(Delivery {
            delivery_ref: parsed.sid,
        })
    }
}
