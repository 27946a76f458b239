//! Email delivery via the SendGrid v3 mail send API.

use async_trait::async_trait;
use serde_json::json;

use crate::channels::{http_client, require};
use crate::config::SendGridConfig;
use crate::error::{ConfigError, DeliveryError};
use crate::notification::{DeliveryStrategy, Notification};

#[derive(Debug)]
pub struct SendGridStrategy {
    client: reqwest::Client,
    api_key: String,
    from_email: String,
    endpoint: String,
}

impl SendGridStrategy {
    pub fn new(config: SendGridConfig) -> Result<Self, ConfigError> {
        let api_key = require("sendgrid", "api_key", config.api_key.as_deref())?;
        let from_email = require("sendgrid", "from_email", config.from_email.as_deref())?;

        Ok(Self {
            client: http_client()?,
            api_key,
            from_email,
            endpoint: format!("{}/v3/mail/send", config.api_base.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl DeliveryStrategy for SendGridStrategy {
    fn provider(&self) -> &'static str {
        "sendgrid"
    }

    async fn send(&self, notification: &Notification) -> Result<(), DeliveryError> {
        let subject = notification.subject.as_deref().unwrap_or("No subject");
        tracing::debug!(
            trace_id = %notification.trace_id(),
            recipient = %notification.to,
            subject = subject,
            "preparing SendGrid email"
        );

        let mut content = vec![json!({ "type": "text/plain", "value": notification.body })];
        if let Some(html) = &notification.html_body {
            content.push(json!({ "type": "text/html", "value": html }));
        }
        let body = json!({
            "personalizations": [{ "to": [{ "email": notification.to }] }],
            "from": { "email": self.from_email },
            "subject": subject,
            "content": content,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
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
                "SendGrid rejected the email"
            );
            return Err(DeliveryError::Rejected {
                provider: "sendgrid",
                status,
                detail,
            });
        }

        tracing::info!(
            trace_id = %notification.trace_id(),
            recipient = %notification.to,
            "email sent via SendGrid"
        );
        Ok(())
    }
}
