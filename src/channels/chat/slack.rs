//! Chat delivery via a Slack incoming webhook.

use async_trait::async_trait;
use serde_json::json;

use crate::channels::{http_client, require};
use crate::config::SlackConfig;
use crate::error::{ConfigError, DeliveryError};
use crate::notification::{DeliveryStrategy, Notification, Status};

/// Emoji and attachment color for each severity tag.
fn status_style(status: Status) -> (&'static str, &'static str) {
    match status {
        Status::Info => ("\u{2139}\u{fe0f}", "#439FE0"),
        Status::Success => ("\u{2705}", "#36A64F"),
        Status::Warning => ("\u{26a0}\u{fe0f}", "#FFCC00"),
        Status::Error | Status::Fail => ("\u{274c}", "#E01E5A"),
    }
}

#[derive(Debug)]
pub struct SlackStrategy {
    client: reqwest::Client,
    webhook_url: String,
}

impl SlackStrategy {
    pub fn new(config: SlackConfig) -> Result<Self, ConfigError> {
        let webhook_url = require("slack", "webhook_url", config.webhook_url.as_deref())?;

        Ok(Self {
            client: http_client()?,
            webhook_url,
        })
    }
}

#[async_trait]
impl DeliveryStrategy for SlackStrategy {
    fn provider(&self) -> &'static str {
        "slack"
    }

    async fn send(&self, notification: &Notification) -> Result<(), DeliveryError> {
        let subject = notification.subject.as_deref().unwrap_or("Notification");
        tracing::debug!(
            trace_id = %notification.trace_id(),
            recipient = %notification.to,
            subject = subject,
            "preparing Slack message"
        );

        let (emoji, color) = status_style(notification.status());

        let mut blocks = vec![
            json!({
                "type": "section",
                "text": { "type": "mrkdwn", "text": format!("{emoji} *{subject}*") },
            }),
            json!({
                "type": "section",
                "text": { "type": "mrkdwn", "text": notification.body },
            }),
        ];
        if let Some(trace_id) = &notification.metadata.trace_id {
            blocks.push(json!({
                "type": "context",
                "elements": [{ "type": "mrkdwn", "text": format!("Trace ID: `{trace_id}`") }],
            }));
        }

        let payload = json!({
            "attachments": [{ "color": color, "blocks": blocks }],
        });

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let detail = response.text().await.unwrap_or_default();
            tracing::error!(
                trace_id = %notification.trace_id(),
                status = status,
                detail = %detail,
                "Slack rejected the message"
            );
            return Err(DeliveryError::Rejected {
                provider: "slack",
                status,
                detail,
            });
        }

        tracing::info!(
            trace_id = %notification.trace_id(),
            recipient = %notification.to,
            "message sent via Slack webhook"
        );
        Ok(())
    }
}
