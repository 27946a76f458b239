//! Email delivery via AWS Simple Email Service.

use async_trait::async_trait;
use aws_sdk_ses::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_ses::error::DisplayErrorContext;
use aws_sdk_ses::types::{Body, Content, Destination, Message};
use aws_sdk_ses::Client;

use crate::channels::require;
use crate::config::SesConfig;
use crate::error::{ConfigError, DeliveryError};
use crate::notification::{DeliveryStrategy, Notification};

#[derive(Debug)]
pub struct SesStrategy {
    client: Client,
    from_email: String,
}

impl SesStrategy {
    pub fn new(config: SesConfig) -> Result<Self, ConfigError> {
        let region = require("ses", "region", config.region.as_deref())?;
        let from_email = require("ses", "from_email", config.from_email.as_deref())?;
        let access_key_id = require("ses", "access_key_id", config.access_key_id.as_deref())?;
        let secret_access_key = require(
            "ses",
            "secret_access_key",
            config.secret_access_key.as_deref(),
        )?;

        let sdk_config = aws_sdk_ses::Config::builder()
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
            from_email,
        })
    }

    fn content(data: &str) -> Result<Content, DeliveryError> {
        Content::builder()
            .charset("UTF-8")
            .data(data)
            .build()
            .map_err(|e| DeliveryError::Sdk {
                provider: "ses",
                detail: e.to_string(),
            })
    }
}

#[async_trait]
impl DeliveryStrategy for SesStrategy {
    fn provider(&self) -> &'static str {
        "ses"
    }

    async fn send(&self, notification: &Notification) -> Result<(), DeliveryError> {
        let subject = notification.subject.as_deref().unwrap_or("No subject");
        tracing::debug!(
            trace_id = %notification.trace_id(),
            recipient = %notification.to,
            subject = subject,
            "preparing SES email"
        );

        // Plain-text body doubles as the HTML part when no markup was given.
        let html = notification
            .html_body
            .clone()
            .unwrap_or_else(|| format!("<pre>{}</pre>", notification.body));

        let message = Message::builder()
            .subject(Self::content(subject)?)
            .body(
                Body::builder()
                    .text(Self::content(&notification.body)?)
                    .html(Self::content(&html)?)
                    .build(),
            )
            .build();

        self.client
            .send_email()
            .source(self.from_email.clone())
            .destination(
                Destination::builder()
                    .to_addresses(notification.to.clone())
                    .build(),
            )
            .message(message)
            .send()
            .await
            .map_err(|e| DeliveryError::Sdk {
                provider: "ses",
                detail: format!("{}", DisplayErrorContext(&e)),
            })?;

        tracing::info!(
            trace_id = %notification.trace_id(),
            recipient = %notification.to,
            "email sent via SES"
        );
        Ok(())
    }
}
