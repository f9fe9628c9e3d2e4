use std::path::PathBuf;
use std::time::Duration;

use crate::error::{GatewayError, Result};

pub const ENV_BASE_URL: &str = "GEMBRIDGE_BASE_URL";
pub const ENV_PROJECT: &str = "GEMBRIDGE_PROJECT";
pub const ENV_LOCATION: &str = "GEMBRIDGE_LOCATION";
pub const ENV_MODEL: &str = "GEMBRIDGE_MODEL";
pub const ENV_TOKEN: &str = "GEMBRIDGE_TOKEN";
pub const ENV_SSO_URL: &str = "GEMBRIDGE_SSO_URL";
pub const ENV_SSO_USER: &str = "GEMBRIDGE_SSO_USER";
pub const ENV_SSO_USER_ALT: &str = "SSO_USER";
pub const ENV_SSO_PASSWORD: &str = "GEMBRIDGE_SSO_PASSWORD";
pub const ENV_SSO_PASSWORD_ALT: &str = "SSO_PASSWORD";
pub const ENV_PROXY: &str = "GEMBRIDGE_PROXY";
pub const ENV_CA_BUNDLE: &str = "GEMBRIDGE_CA_BUNDLE";
pub const ENV_GENERATE_ENABLED: &str = "GEMBRIDGE_GENERATE_ENABLED";
pub const ENV_STREAM_ENABLED: &str = "GEMBRIDGE_STREAM_ENABLED";
pub const ENV_COUNT_TOKENS_ENABLED: &str = "GEMBRIDGE_COUNT_TOKENS_ENABLED";
pub const ENV_EMBED_ENABLED: &str = "GEMBRIDGE_EMBED_ENABLED";
pub const ENV_LOG_REQUESTS: &str = "GEMBRIDGE_LOG_REQUESTS";
pub const ENV_MAX_ATTEMPTS: &str = "GEMBRIDGE_MAX_ATTEMPTS";
pub const ENV_RETRY_BASE_MS: &str = "GEMBRIDGE_RETRY_BASE_MS";
pub const ENV_TIMEOUT_MS: &str = "GEMBRIDGE_TIMEOUT_MS";

const DEFAULT_LOCATION: &str = "us-central1";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_BASE: Duration = Duration::from_millis(500);
const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

// Demo credentials for test/sandbox gateways that accept any identity.
const DEMO_SSO_USER: &str = "gembridge-demo";
const DEMO_SSO_PASSWORD: &str = "gembridge-demo-password";

/// Per-endpoint enable flags. `generate_content` and `embed_content` have no
/// fallback: gated off means every call fails. Constructed once at
/// client-creation time and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointAvailability {
    pub generate_content: bool,
    pub generate_content_stream: bool,
    pub count_tokens: bool,
    pub embed_content: bool,
}

impl Default for EndpointAvailability {
    fn default() -> Self {
        Self {
            generate_content: true,
            generate_content_stream: true,
            count_tokens: true,
            embed_content: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SsoConfig {
    pub url: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub project: String,
    pub location: String,
    pub model: String,
    /// Explicit bearer token; when present the SSO flow is bypassed entirely.
    pub bearer_token: Option<String>,
    pub sso: Option<SsoConfig>,
    pub proxy: Option<String>,
    pub ca_bundle: Option<PathBuf>,
    pub availability: EndpointAvailability,
    pub log_requests: bool,
    pub max_attempts: u32,
    pub retry_base_delay: Duration,
    pub timeout: Duration,
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>, project: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            project: project.into(),
            location: DEFAULT_LOCATION.to_string(),
            model: DEFAULT_MODEL.to_string(),
            bearer_token: None,
            sso: None,
            proxy: None,
            ca_bundle: None,
            availability: EndpointAvailability::default(),
            log_requests: false,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_base_delay: DEFAULT_RETRY_BASE,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Build the whole configuration from `GEMBRIDGE_*` environment
    /// variables. Only the gateway base URL and project are required.
    pub fn from_env() -> Result<Self> {
        let base_url = env_var(ENV_BASE_URL)
            .ok_or_else(|| GatewayError::Configuration(format!("{ENV_BASE_URL} is not set")))?;
        let project = env_var(ENV_PROJECT)
            .ok_or_else(|| GatewayError::Configuration(format!("{ENV_PROJECT} is not set")))?;

        let mut config = Self::new(base_url, project);
        if let Some(location) = env_var(ENV_LOCATION) {
            config.location = location;
        }
        if let Some(model) = env_var(ENV_MODEL) {
            config.model = model;
        }
        config.bearer_token = env_var(ENV_TOKEN);
        config.sso = env_var(ENV_SSO_URL).map(|url| SsoConfig {
            url,
            username: env_var(ENV_SSO_USER)
                .or_else(|| env_var(ENV_SSO_USER_ALT))
                .unwrap_or_else(|| DEMO_SSO_USER.to_string()),
            password: env_var(ENV_SSO_PASSWORD)
                .or_else(|| env_var(ENV_SSO_PASSWORD_ALT))
                .unwrap_or_else(|| DEMO_SSO_PASSWORD.to_string()),
        });
        config.proxy = env_var(ENV_PROXY);
        config.ca_bundle = env_var(ENV_CA_BUNDLE).map(PathBuf::from);
        config.availability = EndpointAvailability {
            generate_content: flag_env(ENV_GENERATE_ENABLED, true),
            generate_content_stream: flag_env(ENV_STREAM_ENABLED, true),
            count_tokens: flag_env(ENV_COUNT_TOKENS_ENABLED, true),
            embed_content: flag_env(ENV_EMBED_ENABLED, true),
        };
        config.log_requests = flag_env(ENV_LOG_REQUESTS, false);
        if let Some(attempts) = env_var(ENV_MAX_ATTEMPTS).and_then(|raw| raw.parse().ok()) {
            config.max_attempts = u32::max(attempts, 1);
        }
        if let Some(millis) = env_var(ENV_RETRY_BASE_MS).and_then(|raw| raw.parse().ok()) {
            config.retry_base_delay = Duration::from_millis(millis);
        }
        if let Some(millis) = env_var(ENV_TIMEOUT_MS).and_then(|raw| raw.parse().ok()) {
            config.timeout = Duration::from_millis(millis);
        }
        Ok(config)
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn flag_env(name: &str, default: bool) -> bool {
    env_var(name)
        .as_deref()
        .and_then(parse_flag)
        .unwrap_or(default)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
