//! Push delivery via the Firebase Cloud Messaging HTTP v1 API.
//!
//! FCM has no static API key: each send authenticates with a short-lived
//! OAuth access token obtained by signing a service-account assertion
//! (RS256) and exchanging it at the Google token endpoint.

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::channels::{http_client, require};
use crate::config::FcmConfig;
use crate::error::{ConfigError, DeliveryError};
use crate::notification::{DeliveryStrategy, Notification};

const FCM_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";
const ASSERTION_TTL_SECS: i64 = 3600;

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

pub struct FcmStrategy {
    client: reqwest::Client,
    signing_key: EncodingKey,
    client_email: String,
    token_uri: String,
    endpoint: String,
}

impl std::fmt::Debug for FcmStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FcmStrategy")
            .field("client", &self.client)
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl FcmStrategy {
    pub fn new(config: FcmConfig) -> Result<Self, ConfigError> {
        let project_id = require("fcm", "project_id", config.project_id.as_deref())?;
        let client_email = require("fcm", "client_email", config.client_email.as_deref())?;
        // Keys supplied through env vars arrive with literal `\n` sequences.
        let private_key =
            require("fcm", "private_key", config.private_key.as_deref())?.replace("\\n", "\n");

        let signing_key = EncodingKey::from_rsa_pem(private_key.as_bytes()).map_err(|e| {
            ConfigError::InvalidSetting {
                provider: "fcm",
                key: "private_key",
                reason: e.to_string(),
            }
        })?;

        let endpoint = format!(
            "{}/v1/projects/{}/messages:send",
            config.api_base.trim_end_matches('/'),
            project_id
        );
        Ok(Self {
            client: http_client()?,
            signing_key,
            client_email,
            token_uri: config.token_uri,
            endpoint,
        })
    }

    /// Mint an access token from the service-account assertion.
    async fn access_token(&self) -> Result<String, DeliveryError> {
        let iat = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: FCM_SCOPE,
            aud: &self.token_uri,
            iat,
            exp: iat + ASSERTION_TTL_SECS,
        };
        let assertion = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.signing_key)
            .map_err(|e| DeliveryError::Auth {
                provider: "fcm",
                detail: e.to_string(),
            })?;

        let response = self
            .client
            .post(&self.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let detail = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Auth {
                provider: "fcm",
                detail: format!("token exchange returned status {status}: {detail}"),
            });
        }

        let token: TokenResponse =
            response
                .json()
                .await
                .map_err(|e| DeliveryError::InvalidResponse {
                    provider: "fcm",
                    detail: e.to_string(),
                })?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl DeliveryStrategy for FcmStrategy {
    fn provider(&self) -> &'static str {
        "fcm"
    }

    async fn send(&self, notification: &Notification) -> Result<(), DeliveryError> {
        let title = notification.subject.as_deref().unwrap_or("New Notification");
        tracing::debug!(
            trace_id = %notification.trace_id(),
            recipient = %notification.to,
            title = title,
            "preparing FCM push"
        );

        let access_token = self.access_token().await?;

        // FCM data payloads only accept string values.
        let mut data = serde_json::Map::new();
        if let Some(trace_id) = &notification.metadata.trace_id {
            data.insert("trace_id".to_string(), json!(trace_id));
        }
        if let Some(status) = notification.metadata.status {
            data.insert("status".to_string(), json!(status.as_str()));
        }
        for (key, value) in &notification.metadata.extra {
            let text = value
                .as_str()
                .map(str::to_owned)
                .unwrap_or_else(|| value.to_string());
            data.insert(key.clone(), json!(text));
        }

        let message = json!({
            "message": {
                "token": notification.to,
                "notification": {
                    "title": title,
                    "body": notification.body,
                },
                "data": data,
            }
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(access_token)
            .json(&message)
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
                "FCM rejected the push"
            );
            return Err(DeliveryError::Rejected {
                provider: "fcm",
                status,
                detail,
            });
        }

        tracing::info!(
            trace_id = %notification.trace_id(),
            recipient = %notification.to,
            "push sent via FCM"
        );
        Ok(())
    }
}
