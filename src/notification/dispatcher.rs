use futures::stream::{FuturesUnordered, StreamExt};

use crate::config::Settings;
use crate::error::{ChannelFailure, DispatchFailure, NotifyError};

use super::{Channel, Notification, StrategyRegistry};

/// Routes one logical notification to every requested channel.
///
/// Stateless between calls: each [`notify`](Dispatcher::notify) is an
/// independent fan-out over the immutable registry, so a single dispatcher
/// can serve the whole process for its lifetime.
#[derive(Debug)]
pub struct Dispatcher {
    registry: StrategyRegistry,
}

impl Dispatcher {
    pub fn new(registry: StrategyRegistry) -> Self {
        Self { registry }
    }

    /// Assemble a ready-to-use dispatcher from settings.
    ///
    /// Equivalent to [`StrategyRegistry::build`] followed by
    /// [`Dispatcher::new`]; any strategy construction failure propagates and
    /// no dispatcher is returned.
    pub fn from_settings(settings: &Settings) -> Result<Self, NotifyError> {
        Ok(Self::new(StrategyRegistry::build(settings)?))
    }

    /// Dispatch `notification` to every channel in `channels` concurrently.
    ///
    /// Duplicate entries fan out once per occurrence; there is no
    /// deduplication. An empty list is a no-op that succeeds immediately.
    ///
    /// All sends run concurrently and settle independently: one channel's
    /// failure neither blocks nor cancels another channel's in-flight send,
    /// and the outcome is observable only after every send has settled. The
    /// call succeeds only if every send succeeds; otherwise the returned
    /// [`NotifyError::Delivery`] report carries every failed channel with its
    /// cause. Sends that completed on other channels are not undone.
    #[tracing::instrument(
        name = "dispatcher.notify",
        skip(self, notification),
        fields(channel_count = channels.len(), trace_id = %notification.trace_id())
    )]
    pub async fn notify(
        &self,
        channels: &[Channel],
        notification: &Notification,
    ) -> Result<(), NotifyError> {
        if channels.is_empty() {
            tracing::debug!("no channels requested, completing trivially");
            return Ok(());
        }

        // One future per requested entry. Draining the unordered set to
        // completion is the structured join: nothing outlives the call, and a
        // failed send never cancels its siblings.
        let mut sends: FuturesUnordered<_> = channels
            .iter()
            .map(|&channel| {
                let strategy = self.registry.resolve(channel);
                async move { (channel, strategy.send(notification).await) }
            })
            .collect();

        let mut failures = Vec::new();
        while let Some((channel, result)) = sends.next().await {
            match result {
                Ok(()) => {
                    tracing::debug!(channel = %channel, "channel delivery succeeded");
                }
                Err(source) => {
                    tracing::warn!(
                        channel = %channel,
                        error = %source,
                        "channel delivery failed"
                    );
                    failures.push(ChannelFailure { channel, source });
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(NotifyError::Delivery(DispatchFailure {
                attempted: channels.len(),
                failures,
            }))
        }
    }

    /// Dispatch to channels given by name.
    ///
    /// Every name is parsed before any send is attempted: a single unknown
    /// name fails the whole call with [`NotifyError::UnsupportedChannel`]
    /// naming it, and no strategy is invoked for any channel of that call.
    pub async fn notify_named<I, S>(
        &self,
        channels: I,
        notification: &Notification,
    ) -> Result<(), NotifyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let channels = channels
            .into_iter()
            .map(|name| name.as_ref().parse())
            .collect::<Result<Vec<Channel>, _>>()?;
        self.notify(&channels, notification).await
    }
}
