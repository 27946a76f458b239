mod settings;

pub use settings::{
    EmailProvider, FcmConfig, OneSignalConfig, ProviderSelection, PushProvider, SendGridConfig,
    SesConfig, Settings, SlackConfig, SmsProvider, SnsConfig, TwilioConfig,
};
