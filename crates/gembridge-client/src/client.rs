use std::sync::Arc;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use futures_util::stream;
use http::header::{AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};
use http::{HeaderMap, HeaderValue};
use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};
use url::Url;

use gembridge_core::{
    ContentGenerator, ContentStream, CountRequest, EmbedRequest, GatewayConfig, GatewayError,
    GenerateRequest, Result, UserTier,
};
use gembridge_protocol::gemini::count_tokens::CountTokensResponse;
use gembridge_protocol::gemini::embed_content::EmbedContentResponse;
use gembridge_protocol::gemini::generate_content::GenerateContentResponse;
use gembridge_protocol::gemini::stream_content::StreamGenerateContentResponse;

use crate::auth::{CredentialCache, SsoAuthClient, StaticToken, TokenSource};
use crate::estimator::estimate_contents;
use crate::redact::redact_body_text;
use crate::transport::{HttpTransport, TransportRequest, TransportResponse};

const OP_GENERATE: &str = "generateContent";
const OP_STREAM: &str = "streamGenerateContent";
const OP_COUNT_TOKENS: &str = "countTokens";
const OP_EMBED: &str = "embedContent";

/// Content generator backed by the enterprise gateway. Every operation
/// targets
/// `{base}/v1/projects/{project}/locations/{location}/publishers/google/models/{model}:{op}`
/// with a bearer token from the injected token source, and retries transient
/// failures with exponential backoff before surfacing one consolidated error.
pub struct EnterpriseClient {
    config: GatewayConfig,
    transport: Arc<HttpTransport>,
    token_source: Arc<dyn TokenSource>,
}

impl EnterpriseClient {
    pub fn new(
        config: GatewayConfig,
        transport: Arc<HttpTransport>,
        token_source: Arc<dyn TokenSource>,
    ) -> Self {
        Self {
            config,
            transport,
            token_source,
        }
    }

    /// Wire up the token source from the config: an explicit bearer token
    /// bypasses SSO entirely, otherwise tokens come from the SSO flow backed
    /// by the on-disk credential cache.
    pub fn from_config(config: GatewayConfig, transport: Arc<HttpTransport>) -> Self {
        let token_source: Arc<dyn TokenSource> = match &config.bearer_token {
            Some(token) => Arc::new(StaticToken::new(token.clone())),
            None => Arc::new(SsoAuthClient::new(
                config.sso.clone(),
                CredentialCache::new(),
                transport.clone(),
            )),
        };
        Self::new(config, transport, token_source)
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    fn operation_url(&self, model: &str, operation: &str) -> Result<Url> {
        let base = self.config.base_url.trim_end_matches('/');
        let raw = format!(
            "{base}/v1/projects/{project}/locations/{location}/publishers/google/models/{model}:{operation}",
            project = self.config.project,
            location = self.config.location,
        );
        Url::parse(&raw)
            .map_err(|err| GatewayError::Configuration(format!("invalid gateway URL {raw}: {err}")))
    }

    async fn authorized_headers(&self) -> Result<HeaderMap> {
        let token = self.token_source.bearer_token().await?;
        let mut bearer = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            GatewayError::Authentication("bearer token contains invalid header characters".into())
        })?;
        bearer.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, bearer);
        Ok(headers)
    }

    /// One logical call: token once, then up to `max_attempts` transport
    /// attempts. Only network-level failures (timeouts included) and 5xx are
    /// retried; the backoff doubles per attempt and a Retry-After hint may
    /// lengthen it.
    async fn post_with_retry(
        &self,
        operation: &'static str,
        url: Url,
        body: JsonValue,
        timeout: Option<Duration>,
    ) -> Result<TransportResponse> {
        let headers = self.authorized_headers().await?;
        let max_attempts = self.config.max_attempts.max(1);
        let mut retry_hint: Option<Duration> = None;
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            if attempt > 1 {
                let backoff = self.config.retry_base_delay * 2u32.pow(attempt - 2);
                let delay = retry_hint.take().map_or(backoff, |hint| hint.max(backoff));
                debug!(
                    event = "gateway_retry",
                    operation,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                );
                tokio::time::sleep(delay).await;
            }
            info!(event = "gateway_request", operation, attempt, url = %url);
            let outcome = self
                .transport
                .execute(TransportRequest {
                    method: http::Method::POST,
                    url: url.clone(),
                    headers: headers.clone(),
                    body: Some(body.clone()),
                    timeout,
                })
                .await;
            match outcome {
                Ok(response) if response.status.is_success() => {
                    info!(
                        event = "gateway_response",
                        operation,
                        attempt,
                        status = response.status.as_u16(),
                    );
                    return Ok(response);
                }
                Ok(response) => {
                    let err = response_error(&response, url.as_str());
                    warn!(
                        event = "gateway_response",
                        operation,
                        attempt,
                        status = response.status.as_u16(),
                    );
                    if err.is_retryable() && attempt < max_attempts {
                        retry_hint = retry_after_hint(&response.headers);
                        continue;
                    }
                    return Err(err);
                }
                Err(err) => {
                    warn!(event = "gateway_response", operation, attempt, error = %err);
                    if err.is_retryable() && attempt < max_attempts {
                        continue;
                    }
                    return Err(err);
                }
            }
        }
    }
}

#[async_trait]
impl ContentGenerator for EnterpriseClient {
    async fn generate_content(&self, request: GenerateRequest) -> Result<GenerateContentResponse> {
        let url = self.operation_url(&self.config.model, OP_GENERATE)?;
        let body = serde_json::to_value(request.wire_body())?;
        let response = self
            .post_with_retry(OP_GENERATE, url, body, request.options.timeout)
            .await?;
        response.json()
    }

    /// The gateway has no incremental delivery: one synchronous call against
    /// the streaming route, emitted as a short chunk sequence (usually a
    /// single element). A 404 from the streaming route transparently falls
    /// back to the non-streaming call.
    async fn generate_content_stream(&self, request: GenerateRequest) -> Result<ContentStream> {
        let url = self.operation_url(&self.config.model, OP_STREAM)?;
        let body = serde_json::to_value(request.wire_body())?;
        let timeout = request.options.timeout;
        match self.post_with_retry(OP_STREAM, url, body, timeout).await {
            Ok(response) => {
                let parsed: StreamGenerateContentResponse = response.json()?;
                let chunks = parsed.into_chunks();
                Ok(Box::pin(stream::iter(chunks.into_iter().map(Ok))))
            }
            Err(err) if err.is_not_found() => {
                debug!(
                    event = "stream_route_missing",
                    "streaming route not found, replaying via generateContent"
                );
                let response = self.generate_content(request).await?;
                Ok(Box::pin(stream::iter([Ok(response)])))
            }
            Err(err) => Err(err),
        }
    }

    async fn count_tokens(&self, request: CountRequest) -> Result<CountTokensResponse> {
        let model = request.model.as_deref().unwrap_or(self.config.model.as_str());
        let url = self.operation_url(model, OP_COUNT_TOKENS)?;
        let body = serde_json::to_value(request.wire_body())?;
        match self
            .post_with_retry(OP_COUNT_TOKENS, url, body, request.options.timeout)
            .await
        {
            Ok(response) => response.json(),
            // Defensive secondary to the endpoint gate: a gateway without the
            // counting route gets a local estimate instead of an error.
            Err(err) if err.is_not_found() => {
                debug!(event = "count_tokens_estimated", error = %err);
                Ok(CountTokensResponse::new(estimate_contents(
                    &request.contents,
                )))
            }
            Err(err) => Err(err),
        }
    }

    async fn embed_content(&self, request: EmbedRequest) -> Result<EmbedContentResponse> {
        let url = self.operation_url(&self.config.model, OP_EMBED)?;
        let body = serde_json::to_value(request.wire_body())?;
        let response = self
            .post_with_retry(OP_EMBED, url, body, request.options.timeout)
            .await?;
        response.json()
    }

    fn user_tier(&self) -> Option<UserTier> {
        // Tiering is not meaningful off the standard backend.
        None
    }
}

fn response_error(response: &TransportResponse, url: &str) -> GatewayError {
    let body = redact_body_text(&response.body);
    let status = response.status.as_u16();
    if response.status.is_server_error() {
        GatewayError::Server {
            status,
            url: url.to_string(),
            body,
        }
    } else {
        GatewayError::Client {
            status,
            url: url.to_string(),
            body,
        }
    }
}

fn retry_after_hint(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();
    if let Ok(seconds) = value.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }
    httpdate::parse_http_date(value)
        .ok()
        .and_then(|when| when.duration_since(SystemTime::now()).ok())
}
