use async_trait::async_trait;

use crate::error::DeliveryError;

use super::Notification;

/// A single best-effort delivery mechanism for one (channel, provider) pair.
///
/// Implementations are constructed once at assembly time with validated,
/// immutable configuration; anything that can fail without network I/O
/// (missing credentials, unparseable keys) must fail construction, not
/// `send`.
///
/// Implementations must be safe to invoke concurrently: the dispatcher may
/// run several `send`s on the same instance at once (duplicate channel
/// entries in one call fan out independently), so any internal mutable state
/// needs its own synchronization.
#[async_trait]
pub trait DeliveryStrategy: Send + Sync {
    /// Provider label used in logs and error reports.
    fn provider(&self) -> &'static str;

    /// Deliver the notification.
    ///
    /// A single attempt: either the provider accepted the message or the
    /// returned error carries the cause. The dispatcher never retries and
    /// never suppresses the error.
    async fn send(&self, notification: &Notification) -> Result<(), DeliveryError>;
}
