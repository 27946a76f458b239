//! SMS delivery via the Twilio Messages API.

use async_trait::async_trait;

use crate::channels::{http_client, require};
use crate::config::TwilioConfig;
use crate::error::{ConfigError, DeliveryError};
use crate::notification::{DeliveryStrategy, Notification};

#[derive(Debug)]
pub struct TwilioStrategy {
    client: reqwest::Client,
    account_sid: String,
    auth_token: String,
    from_number: String,
    endpoint: String,
}

impl TwilioStrategy {
    pub fn new(config: TwilioConfig) -> Result<Self, ConfigError> {
        let account_sid = require("twilio", "account_sid", config.account_sid.as_deref())?;
        let auth_token = require("twilio", "auth_token", config.auth_token.as_deref())?;
        let from_number = require("twilio", "from_number", config.from_number.as_deref())?;

        let endpoint = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            config.api_base.trim_end_matches('/'),
            account_sid
        );
        Ok(Self {
            client: http_client()?,
            account_sid,
            auth_token,
            from_number,
            endpoint,
        })
    }
}

#[async_trait]
impl DeliveryStrategy for TwilioStrategy {
    fn provider(&self) -> &'static str {
        "twilio"
    }

    async fn send(&self, notification: &Notification) -> Result<(), DeliveryError> {
        tracing::debug!(
            trace_id = %notification.trace_id(),
            recipient = %notification.to,
            "preparing Twilio SMS"
        );

        let params = [
            ("To", notification.to.as_str()),
            ("From", self.from_number.as_str()),
            ("Body", notification.body.as_str()),
        ];

        let response = self
            .client
            .post(&self.endpoint)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let detail = response.text().await.unwrap_or_default();
            tracing::error!(
                trace_id = %notification.trace_id(),
                recipient = %notification.to,
                status = status,
                detail = %detail,
                "Twilio rejected the SMS"
            );
            return Err(DeliveryError::Rejected {
                provider: "twilio",
                status,
                detail,
            });
        }

        let payload: serde_json::Value =
            response
                .json()
                .await
                .map_err(|e| DeliveryError::InvalidResponse {
                    provider: "twilio",
                    detail: e.to_string(),
                })?;
        let sid = payload
            .get("sid")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("unknown");

        tracing::info!(
            trace_id = %notification.trace_id(),
            recipient = %notification.to,
            sid = sid,
            "SMS sent via Twilio"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_requires_credentials() {
        let err = TwilioStrategy::new(TwilioConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingSetting {
                provider: "twilio",
                key: "account_sid"
            }
        ));
    }

    #[test]
    fn test_endpoint_embeds_account_sid() {
        let strategy = TwilioStrategy::new(TwilioConfig {
            account_sid: Some("AC123".to_string()),
            auth_token: Some("secret".to_string()),
            from_number: Some("+15550009999".to_string()),
            ..TwilioConfig::default()
        })
        .unwrap();
        assert_eq!(
            strategy.endpoint,
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
    }
}
