//! Push delivery via the OneSignal create-notification API.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde_json::json;

use crate::channels::{http_client, require};
use crate::config::OneSignalConfig;
use crate::error::{ConfigError, DeliveryError};
use crate::notification::{DeliveryStrategy, Notification};

#[derive(Debug)]
pub struct OneSignalStrategy {
    client: reqwest::Client,
    app_id: String,
    api_key: String,
    endpoint: String,
}

impl OneSignalStrategy {
    pub fn new(config: OneSignalConfig) -> Result<Self, ConfigError> {
        let app_id = require("onesignal", "app_id", config.app_id.as_deref())?;
        let api_key = require("onesignal", "api_key", config.api_key.as_deref())?;

        Ok(Self {
            client: http_client()?,
            app_id,
            api_key,
            endpoint: format!(
                "{}/api/v1/notifications",
                config.api_base.trim_end_matches('/')
            ),
        })
    }
}

#[async_trait]
impl DeliveryStrategy for OneSignalStrategy {
    fn provider(&self) -> &'static str {
        "onesignal"
    }

    async fn send(&self, notification: &Notification) -> Result<(), DeliveryError> {
        let heading = notification.subject.as_deref().unwrap_or("New Notification");
        tracing::debug!(
            trace_id = %notification.trace_id(),
            recipient = %notification.to,
            heading = heading,
            "preparing OneSignal push"
        );

        let body = json!({
            "app_id": self.app_id,
            "include_external_user_ids": [notification.to],
            "headings": { "en": heading },
            "contents": { "en": notification.body },
            "data": notification.metadata,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("Basic {}", self.api_key))
            .json(&body)
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
                "OneSignal rejected the push"
            );
            return Err(DeliveryError::Rejected {
                provider: "onesignal",
                status,
                detail,
            });
        }

        let payload: serde_json::Value =
            response
                .json()
                .await
                .map_err(|e| DeliveryError::InvalidResponse {
                    provider: "onesignal",
                    detail: e.to_string(),
                })?;
        let id = payload
            .get("id")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("unknown");

        tracing::info!(
            trace_id = %notification.trace_id(),
            recipient = %notification.to,
            id = id,
            "push sent via OneSignal"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_requires_app_id() {
        let err = OneSignalStrategy::new(OneSignalConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingSetting {
                provider: "onesignal",
                key: "app_id"
            }
        ));
    }
}
