pub mod cache;

pub use cache::{CACHE_FILE, Credential, CredentialCache};

use std::sync::Arc;

use async_trait::async_trait;
use http::HeaderMap;
use http::header::CONTENT_TYPE;
use tracing::{debug, warn};
use url::Url;

use gembridge_core::{GatewayError, Result, SsoConfig};
use gembridge_protocol::sso::{TokenExchangeRequest, TokenExchangeResponse};

use crate::redact::redact_body_text;
use crate::transport::{HttpTransport, TransportRequest};

// The identity provider requires the OTP fields to be present even when the
// account has no second factor enrolled.
const OTP_PLACEHOLDER: &str = "";
const OTP_TYPE_PLACEHOLDER: &str = "";

/// Where bearer tokens come from. Injected into the enterprise client so the
/// token strategy is a constructor-time decision.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn bearer_token(&self) -> Result<String>;
}

/// Explicitly configured token; no SSO involved.
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    async fn bearer_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}

/// Exchanges enterprise credentials for a bearer token, consulting the
/// credential cache first. A valid cached token is returned without any
/// network traffic.
pub struct SsoAuthClient {
    config: Option<SsoConfig>,
    cache: CredentialCache,
    transport: Arc<HttpTransport>,
}

impl SsoAuthClient {
    pub fn new(
        config: Option<SsoConfig>,
        cache: CredentialCache,
        transport: Arc<HttpTransport>,
    ) -> Self {
        Self {
            config,
            cache,
            transport,
        }
    }

    pub async fn token(&self) -> Result<String> {
        let Some(config) = &self.config else {
            return Err(GatewayError::Configuration(
                "SSO endpoint URL is not configured".into(),
            ));
        };

        if let Some(credential) = self.cache.load().await {
            if credential.is_valid() {
                debug!(event = "sso_cache_hit");
                return Ok(credential.token);
            }
        }

        let url = Url::parse(&config.url)
            .map_err(|err| GatewayError::Configuration(format!("invalid SSO URL: {err}")))?;
        let body = serde_json::to_value(TokenExchangeRequest {
            userid: config.username.clone(),
            password: config.password.clone(),
            otp: OTP_PLACEHOLDER.into(),
            otp_type: OTP_TYPE_PLACEHOLDER.into(),
        })?;
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, http::HeaderValue::from_static("application/json"));

        debug!(event = "sso_exchange", url = %url, userid = %config.username);
        let response = self
            .transport
            .execute(TransportRequest::post_json(url, headers, body))
            .await
            .map_err(|err| GatewayError::Authentication(format!("SSO request failed: {err}")))?;

        if !response.status.is_success() {
            return Err(GatewayError::Authentication(format!(
                "SSO endpoint answered {}: {}",
                response.status.as_u16(),
                redact_body_text(&response.body),
            )));
        }

        let payload: TokenExchangeResponse = response
            .json()
            .map_err(|err| GatewayError::Authentication(format!("SSO response malformed: {err}")))?;
        if let Err(err) = self.cache.save(&payload.id_token, payload.expires_in).await {
            warn!(event = "credential_cache_write_failed", error = %err);
        }
        Ok(payload.id_token)
    }
}

#[async_trait]
impl TokenSource for SsoAuthClient {
    async fn bearer_token(&self) -> Result<String> {
        self.token().await
    }
}
