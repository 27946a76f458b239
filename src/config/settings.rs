use config::{Config, Environment, File};
use serde::Deserialize;
use std::env;

/// Assembly-time configuration for the dispatcher.
///
/// `providers` picks which concrete strategy backs each multi-provider
/// channel; the per-provider sections carry that provider's credentials and
/// endpoint. Only the sections for the selected providers are validated;
/// validation happens in the strategy constructors, which fail assembly
/// eagerly on a missing or invalid value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub providers: ProviderSelection,
    #[serde(default)]
    pub sendgrid: SendGridConfig,
    #[serde(default)]
    pub ses: SesConfig,
    #[serde(default)]
    pub twilio: TwilioConfig,
    #[serde(default)]
    pub sns: SnsConfig,
    #[serde(default)]
    pub fcm: FcmConfig,
    #[serde(default)]
    pub onesignal: OneSignalConfig,
    #[serde(default)]
    pub slack: SlackConfig,
}

/// Per-channel choice of concrete strategy implementation.
///
/// Immutable for the lifetime of the assembled dispatcher. Chat has a single
/// provider (Slack) and no selector.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ProviderSelection {
    #[serde(default)]
    pub email: EmailProvider,
    #[serde(default)]
    pub sms: SmsProvider,
    #[serde(default)]
    pub push: PushProvider,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailProvider {
    #[default]
    Sendgrid,
    Ses,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmsProvider {
    #[default]
    Twilio,
    Sns,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PushProvider {
    #[default]
    Fcm,
    Onesignal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendGridConfig {
    pub api_key: Option<String>,
    pub from_email: Option<String>,
    #[serde(default = "default_sendgrid_api_base")]
    pub api_base: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SesConfig {
    pub region: Option<String>,
    pub from_email: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TwilioConfig {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    /// Sender phone number in E.164 form.
    pub from_number: Option<String>,
    #[serde(default = "default_twilio_api_base")]
    pub api_base: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnsConfig {
    pub region: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FcmConfig {
    pub project_id: Option<String>,
    /// Service-account email.
    pub client_email: Option<String>,
    /// Service-account RSA private key, PEM. Literal `\n` sequences are
    /// accepted so the key can be supplied through an environment variable.
    pub private_key: Option<String>,
    #[serde(default = "default_fcm_token_uri")]
    pub token_uri: String,
    #[serde(default = "default_fcm_api_base")]
    pub api_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OneSignalConfig {
    pub app_id: Option<String>,
    pub api_key: Option<String>,
    #[serde(default = "default_onesignal_api_base")]
    pub api_base: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlackConfig {
    pub webhook_url: Option<String>,
}

fn default_sendgrid_api_base() -> String {
    "https://api.sendgrid.com".to_string()
}

fn default_twilio_api_base() -> String {
    "https://api.twilio.com".to_string()
}

fn default_fcm_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

fn default_fcm_api_base() -> String {
    "https://fcm.googleapis.com".to_string()
}

fn default_onesignal_api_base() -> String {
    "https://onesignal.com".to_string()
}

impl Settings {
    /// Load settings from config files and environment variables.
    ///
    /// Sources, later overriding earlier: built-in defaults, an optional
    /// `config/default` file, an optional `config/{RUN_MODE}` file, then
    /// environment variables with `__` as the section separator
    /// (`SENDGRID__API_KEY`, `PROVIDERS__EMAIL`, ...).
    pub fn new() -> Result<Self, config::ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(Environment::default().separator("__").try_parsing(true));

        builder.build()?.try_deserialize()
    }
}

impl Default for SendGridConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            from_email: None,
            api_base: default_sendgrid_api_base(),
        }
    }
}

impl Default for TwilioConfig {
    fn default() -> Self {
        Self {
            account_sid: None,
            auth_token: None,
            from_number: None,
            api_base: default_twilio_api_base(),
        }
    }
}

impl Default for FcmConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            client_email: None,
            private_key: None,
            token_uri: default_fcm_token_uri(),
            api_base: default_fcm_api_base(),
        }
    }
}

impl Default for OneSignalConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            api_key: None,
            api_base: default_onesignal_api_base(),
        }
    }
}
