use thiserror::Error;

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors surfaced by the shim. Retries are exhausted inside the client
/// before any of these cross a component boundary; callers never see partial
/// responses as success.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Required configuration is absent. Fatal, never retried.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// SSO or token exchange failed. Fatal for the current call; a later call
    /// starts the SSO flow from scratch.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Network-level failure with no response.
    #[error("network error: {0}")]
    Transport(String),

    /// The request deadline elapsed before a response arrived.
    #[error("request timed out: {url}")]
    Timeout { url: String },

    /// The backend answered 5xx.
    #[error("server error {status} from {url}: {body}")]
    Server { status: u16, url: String, body: String },

    /// The backend answered 4xx. Retrying a malformed request cannot succeed.
    #[error("client error {status} from {url}: {body}")]
    Client { status: u16, url: String, body: String },

    /// The operation is gated off by the availability config.
    #[error("{operation} is not available on this gateway")]
    EndpointDisabled { operation: &'static str },

    /// A response body did not match the expected shape.
    #[error("parse error: {0}")]
    Parse(String),
}

impl GatewayError {
    /// Transient failures worth another attempt: no response at all, a
    /// timeout, or a 5xx.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GatewayError::Transport(_) | GatewayError::Timeout { .. } | GatewayError::Server { .. }
        )
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Server { status, .. } | GatewayError::Client { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Parse(err.to_string())
    }
}
