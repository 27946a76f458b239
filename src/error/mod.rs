use thiserror::Error;

use crate::notification::Channel;

/// Errors raised while assembling the dispatcher.
///
/// Always fatal to assembly: the first failing strategy constructor aborts
/// [`StrategyRegistry::build`](crate::notification::StrategyRegistry::build)
/// and no partially built registry exists afterwards.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{provider}: missing required setting `{key}`")]
    MissingSetting {
        provider: &'static str,
        key: &'static str,
    },

    #[error("{provider}: invalid setting `{key}`: {reason}")]
    InvalidSetting {
        provider: &'static str,
        key: &'static str,
        reason: String,
    },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Errors raised by a single delivery attempt on one channel.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The request never produced a provider response (connect, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("{provider} rejected the request (status {status}): {detail}")]
    Rejected {
        provider: &'static str,
        status: u16,
        detail: String,
    },

    /// Credential exchange or request signing failed.
    #[error("{provider} authentication failed: {detail}")]
    Auth {
        provider: &'static str,
        detail: String,
    },

    /// A vendor SDK call failed.
    #[error("{provider} error: {detail}")]
    Sdk {
        provider: &'static str,
        detail: String,
    },

    /// The provider accepted the request but its response could not be read.
    #[error("{provider} returned an unreadable response: {detail}")]
    InvalidResponse {
        provider: &'static str,
        detail: String,
    },
}

/// One failed channel within a dispatch call.
#[derive(Debug, Error)]
#[error("{channel}: {source}")]
pub struct ChannelFailure {
    /// Channel whose strategy failed.
    pub channel: Channel,
    /// Underlying delivery error.
    #[source]
    pub source: DeliveryError,
}

/// Aggregate outcome of a dispatch call where at least one channel failed.
///
/// Carries every failure observed in the call; sends that completed on other
/// channels are not undone.
#[derive(Debug)]
pub struct DispatchFailure {
    /// Number of sends attempted in the call (duplicate channels counted).
    pub attempted: usize,
    /// Every failed channel, in completion order.
    pub failures: Vec<ChannelFailure>,
}

impl DispatchFailure {
    /// The first failure observed.
    pub fn first(&self) -> Option<&ChannelFailure> {
        self.failures.first()
    }
}

impl std::fmt::Display for DispatchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "delivery failed on {} of {} channel(s): ",
            self.failures.len(),
            self.attempted
        )?;
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}

/// Top-level error surface of the crate.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("unsupported notification channel: {0}")]
    UnsupportedChannel(String),

    #[error("{0}")]
    Delivery(DispatchFailure),
}

pub type Result<T> = std::result::Result<T, NotifyError>;
