use std::sync::Arc;

use crate::channels::chat::SlackStrategy;
use crate::channels::email::{SendGridStrategy, SesStrategy};
use crate::channels::push::{FcmStrategy, OneSignalStrategy};
use crate::channels::sms::{SnsStrategy, TwilioStrategy};
use crate::config::{EmailProvider, PushProvider, Settings, SmsProvider};
use crate::error::ConfigError;

use super::{Channel, DeliveryStrategy};

/// Immutable mapping from [`Channel`] to exactly one strategy instance.
///
/// Built once at assembly time and read-only afterwards; there is no runtime
/// re-registration. One field per channel makes a partially built or unmapped
/// registry unrepresentable, so resolution is a pure, infallible lookup.
pub struct StrategyRegistry {
    email: Arc<dyn DeliveryStrategy>,
    sms: Arc<dyn DeliveryStrategy>,
    push: Arc<dyn DeliveryStrategy>,
    chat: Arc<dyn DeliveryStrategy>,
}

impl std::fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("email", &self.email.provider())
            .field("sms", &self.sms.provider())
            .field("push", &self.push.provider())
            .field("chat", &self.chat.provider())
            .finish()
    }
}

impl StrategyRegistry {
    /// Build the registry from settings, constructing one strategy per
    /// channel according to the provider selection (default provider when
    /// unspecified).
    ///
    /// Strategy constructors validate their configuration eagerly; the first
    /// failure aborts assembly and propagates out of `build`. Credential
    /// loading and client construction happen here exactly once, keeping
    /// dispatch a pure routing operation.
    pub fn build(settings: &Settings) -> Result<Self, ConfigError> {
        let email: Arc<dyn DeliveryStrategy> = match settings.providers.email {
            EmailProvider::Sendgrid => Arc::new(SendGridStrategy::new(settings.sendgrid.clone())?),
            EmailProvider::Ses => Arc::new(SesStrategy::new(settings.ses.clone())?),
        };
        tracing::info!(
            channel = %Channel::Email,
            provider = email.provider(),
            "registered delivery strategy"
        );

        let sms: Arc<dyn DeliveryStrategy> = match settings.providers.sms {
            SmsProvider::Twilio => Arc::new(TwilioStrategy::new(settings.twilio.clone())?),
            SmsProvider::Sns => Arc::new(SnsStrategy::new(settings.sns.clone())?),
        };
        tracing::info!(
            channel = %Channel::Sms,
            provider = sms.provider(),
            "registered delivery strategy"
        );

        let push: Arc<dyn DeliveryStrategy> = match settings.providers.push {
            PushProvider::Fcm => Arc::new(FcmStrategy::new(settings.fcm.clone())?),
            PushProvider::Onesignal => Arc::new(OneSignalStrategy::new(settings.onesignal.clone())?),
        };
        tracing::info!(
            channel = %Channel::Push,
            provider = push.provider(),
            "registered delivery strategy"
        );

        let chat: Arc<dyn DeliveryStrategy> = Arc::new(SlackStrategy::new(settings.slack.clone())?);
        tracing::info!(
            channel = %Channel::Chat,
            provider = chat.provider(),
            "registered delivery strategy"
        );

        Ok(Self {
            email,
            sms,
            push,
            chat,
        })
    }

    /// Assemble directly from caller-supplied strategies.
    ///
    /// Lets the embedding application swap in custom implementations, and
    /// tests swap in recording doubles, without going through settings.
    pub fn with_strategies(
        email: Arc<dyn DeliveryStrategy>,
        sms: Arc<dyn DeliveryStrategy>,
        push: Arc<dyn DeliveryStrategy>,
        chat: Arc<dyn DeliveryStrategy>,
    ) -> Self {
        Self {
            email,
            sms,
            push,
            chat,
        }
    }

    /// Resolve the strategy backing a channel.
    ///
    /// Pure lookup, no I/O. Never fails for the closed channel set; the
    /// string boundary ([`Channel::from_str`]) rejects unknown names before
    /// they can reach this point.
    pub fn resolve(&self, channel: Channel) -> &dyn DeliveryStrategy {
        match channel {
            Channel::Email => self.email.as_ref(),
            Channel::Sms => self.sms.as_ref(),
            Channel::Push => self.push.as_ref(),
            Channel::Chat => self.chat.as_ref(),
        }
    }
}
