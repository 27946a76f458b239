// Infrastructure layer (shared components)
pub mod config;
pub mod error;

// Domain layer (dispatch and strategy resolution)
pub mod notification;

// Per-provider delivery strategies
pub mod channels;

pub use config::{
    EmailProvider, FcmConfig, OneSignalConfig, ProviderSelection, PushProvider, SendGridConfig,
    SesConfig, Settings, SlackConfig, SmsProvider, SnsConfig, TwilioConfig,
};
pub use error::{ChannelFailure, ConfigError, DeliveryError, DispatchFailure, NotifyError};
pub use notification::{
    Channel, DeliveryStrategy, Dispatcher, Metadata, Notification, NotificationBuilder, Status,
    StrategyRegistry,
};
