//! Per-(channel, provider) delivery strategies.
//!
//! Each strategy is a thin one-shot client for a single vendor API: it
//! validates its configuration at construction, builds a provider request
//! from the notification, and maps transport errors and vendor rejections
//! into [`DeliveryError`](crate::error::DeliveryError). Everything here is
//! swappable behind the [`DeliveryStrategy`](crate::notification::DeliveryStrategy)
//! contract; none of it is visible to the dispatch layer.

pub mod chat;
pub mod email;
pub mod push;
pub mod sms;

use std::time::Duration;

use crate::error::ConfigError;

/// Per-request timeout applied to every provider HTTP client.
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the HTTP client a strategy instance holds for its lifetime.
pub(crate) fn http_client() -> Result<reqwest::Client, ConfigError> {
    Ok(reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?)
}

/// Extract a required setting, trimming whitespace and failing fast when the
/// value is absent or empty.
pub(crate) fn require(
    provider: &'static str,
    key: &'static str,
    value: Option<&str>,
) -> Result<String, ConfigError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_owned()),
        _ => Err(ConfigError::MissingSetting { provider, key }),
    }
}
