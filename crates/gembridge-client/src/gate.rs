use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use futures_util::stream;
use tracing::warn;

use gembridge_core::{
    ContentGenerator, ContentStream, CountRequest, EmbedRequest, EndpointAvailability,
    GatewayError, GenerateRequest, Result, UserTier,
};
use gembridge_protocol::gemini::count_tokens::CountTokensResponse;
use gembridge_protocol::gemini::embed_content::EmbedContentResponse;
use gembridge_protocol::gemini::generate_content::GenerateContentResponse;

use crate::estimator::estimate_contents;

/// Enforces per-endpoint availability in front of any generator. Operations
/// with a fallback (streaming, token counting) substitute it after a one-time
/// warning; operations without one fail with `EndpointDisabled`. The warning
/// flags are the only mutable state and a duplicate warning under a racing
/// first call is harmless.
pub struct EndpointGate {
    inner: Arc<dyn ContentGenerator>,
    availability: EndpointAvailability,
    stream_warned: AtomicBool,
    count_warned: AtomicBool,
}

impl EndpointGate {
    pub fn new(inner: Arc<dyn ContentGenerator>, availability: EndpointAvailability) -> Self {
        Self {
            inner,
            availability,
            stream_warned: AtomicBool::new(false),
            count_warned: AtomicBool::new(false),
        }
    }

    pub fn availability(&self) -> EndpointAvailability {
        self.availability
    }

    fn warn_once(flag: &AtomicBool, operation: &str, substitute: &str) {
        if !flag.swap(true, Ordering::Relaxed) {
            warn!(
                event = "endpoint_fallback",
                operation, substitute, "endpoint disabled by configuration, substituting fallback"
            );
        }
    }
}

#[async_trait]
impl ContentGenerator for EndpointGate {
    async fn generate_content(&self, request: GenerateRequest) -> Result<GenerateContentResponse> {
        if !self.availability.generate_content {
            return Err(GatewayError::EndpointDisabled {
                operation: "generateContent",
            });
        }
        self.inner.generate_content(request).await
    }

    async fn generate_content_stream(&self, request: GenerateRequest) -> Result<ContentStream> {
        if !self.availability.generate_content_stream {
            Self::warn_once(
                &self.stream_warned,
                "streamGenerateContent",
                "single-shot generateContent",
            );
            let response = self.inner.generate_content(request).await?;
            return Ok(Box::pin(stream::iter([Ok(response)])));
        }
        self.inner.generate_content_stream(request).await
    }

    async fn count_tokens(&self, request: CountRequest) -> Result<CountTokensResponse> {
        if !self.availability.count_tokens {
            Self::warn_once(&self.count_warned, "countTokens", "local estimate");
            return Ok(CountTokensResponse::new(estimate_contents(
                &request.contents,
            )));
        }
        self.inner.count_tokens(request).await
    }

    async fn embed_content(&self, request: EmbedRequest) -> Result<EmbedContentResponse> {
        if !self.availability.embed_content {
            return Err(GatewayError::EndpointDisabled {
                operation: "embedContent",
            });
        }
        self.inner.embed_content(request).await
    }

    fn user_tier(&self) -> Option<UserTier> {
        self.inner.user_tier()
    }
}
