use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NotifyError;

/// Delivery medium identifier, used as the routing key.
///
/// The set is closed: every variant has exactly one resolvable strategy in an
/// assembled [`StrategyRegistry`](super::StrategyRegistry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Sms,
    Push,
    Chat,
}

impl Channel {
    /// All channels, in declaration order.
    pub const ALL: [Channel; 4] = [Channel::Email, Channel::Sms, Channel::Push, Channel::Chat];

    /// Stable lowercase name used in configuration, logs and error reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Email => "email",
            Channel::Sms => "sms",
            Channel::Push => "push",
            Channel::Chat => "chat",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = NotifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(Channel::Email),
            "sms" => Ok(Channel::Sms),
            "push" => Ok(Channel::Push),
            "chat" => Ok(Channel::Chat),
            other => Err(NotifyError::UnsupportedChannel(other.to_string())),
        }
    }
}

/// Severity tag attached to a notification.
///
/// Presentation-oriented strategies (Slack) use it to pick styling; transport
/// strategies ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Info,
    Success,
    Warning,
    Error,
    Fail,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Info => "info",
            Status::Success => "success",
            Status::Warning => "warning",
            Status::Error => "error",
            Status::Fail => "fail",
        }
    }
}

/// Metadata carried alongside the notification body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// Correlation identifier for tracing the message across services.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    /// Severity tag, consumed by presentation-oriented strategies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    /// Additional provider-visible values.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// The logical message handed to every resolved strategy.
///
/// Immutable once built; the dispatcher shares one instance by reference
/// across all concurrent sends of a call, so strategies cannot mutate it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Recipient address or token. Opaque to the core; only the chosen
    /// strategy gives it meaning (email address, phone number, device token,
    /// chat handle).
    pub to: String,
    /// Subject or title, when the channel has a notion of one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Plain-text body.
    pub body: String,
    /// Rich/markup body for channels that render it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_body: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Notification {
    /// Create a builder with the two required fields.
    pub fn builder(to: impl Into<String>, body: impl Into<String>) -> NotificationBuilder {
        NotificationBuilder::new(to, body)
    }

    /// Trace id for logging, `"n/a"` when absent.
    pub fn trace_id(&self) -> &str {
        self.metadata.trace_id.as_deref().unwrap_or("n/a")
    }

    /// Severity tag, defaulting to [`Status::Info`].
    pub fn status(&self) -> Status {
        self.metadata.status.unwrap_or_default()
    }
}

/// Builder for [`Notification`].
#[derive(Debug, Clone)]
pub struct NotificationBuilder {
    to: String,
    subject: Option<String>,
    body: String,
    html_body: Option<String>,
    metadata: Metadata,
}

impl NotificationBuilder {
    pub fn new(to: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: None,
            body: body.into(),
            html_body: None,
            metadata: Metadata::default(),
        }
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn html_body(mut self, html_body: impl Into<String>) -> Self {
        self.html_body = Some(html_body.into());
        self
    }

    pub fn trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.metadata.trace_id = Some(trace_id.into());
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        self.metadata.status = Some(status);
        self
    }

    /// Attach an additional metadata value.
    pub fn extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.extra.insert(key.into(), value);
        self
    }

    pub fn build(self) -> Notification {
        Notification {
            to: self.to,
            subject: self.subject,
            body: self.body,
            html_body: self.html_body,
            metadata: self.metadata,
        }
    }
}
