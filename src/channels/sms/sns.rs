//! SMS delivery via AWS Simple Notification Service.

use async_trait::async_trait;
use aws_sdk_sns::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_sns::error::DisplayErrorContext;
use aws_sdk_sns::Client;

use crate::channels::require;
use crate::config::SnsConfig;
use crate::error::{ConfigError, DeliveryError};
use crate::notification::{DeliveryStrategy, Notification};

#[derive(Debug)]
pub struct SnsStrategy {
    client: Client,
}

impl SnsStrategy {
    pub fn new(config: SnsConfig) -> Result<Self, ConfigError> {
        let region = require("sns", "region", config.region.as_deref())?;
        let access_key_id = require("sns", "access_key_id", config.access_key_id.as_deref())?;
        let secret_access_key = require(
            "sns",
            "secret_access_key",
            config.secret_access_key.as_deref(),
        )?;

        let sdk_config = aws_sdk_sns::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region))
            .credentials_provider(Credentials::new(
                access_key_id,
                secret_access_key,
                None,
                None,
                "herald-settings",
            ))
            .build();

        Ok(Self {
            client: Client::from_conf(sdk_config),
        })
    }
}

#[async_trait]
impl DeliveryStrategy for SnsStrategy {
    fn provider(&self) -> &'static str {
        "sns"
    }

    async fn send(&self, notification: &Notification) -> Result<(), DeliveryError> {
        tracing::debug!(
            trace_id = %notification.trace_id(),
            recipient = %notification.to,
            "preparing SNS SMS"
        );

        let output = self
            .client
            .publish()
            .phone_number(notification.to.clone())
            .message(notification.body.clone())
            .send()
            .await
            .map_err(|e| DeliveryError::Sdk {
                provider: "sns",
                detail: format!("{}", DisplayErrorContext(&e)),
            })?;

        tracing::info!(
            trace_id = %notification.trace_id(),
            recipient = %notification.to,
            message_id = output.message_id().unwrap_or("unknown"),
            "SMS sent via SNS"
        );
        Ok(())
    }
}
