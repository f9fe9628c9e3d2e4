use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;

use gembridge_protocol::gemini::count_tokens::CountTokensResponse;
use gembridge_protocol::gemini::embed_content::EmbedContentResponse;
use gembridge_protocol::gemini::generate_content::GenerateContentResponse;

use crate::error::Result;
use crate::request::{CountRequest, EmbedRequest, GenerateRequest};

/// Stream of generation chunks. A gateway without incremental delivery yields
/// exactly one element.
pub type ContentStream = Pin<Box<dyn Stream<Item = Result<GenerateContentResponse>> + Send>>;

/// Subscription tier reported by the standard backend. The enterprise gateway
/// has no tier notion, so implementations backed by it report `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserTier {
    Free,
    Legacy,
    Standard,
}

/// The content-generation contract shared by the SDK-backed generator and the
/// enterprise client, and enforced by the endpoint gate.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate_content(&self, request: GenerateRequest) -> Result<GenerateContentResponse>;

    /// Callers must not assume incremental delivery: a backend without a true
    /// streaming route emits the complete response as a single chunk, which
    /// is indistinguishable from a degenerate one-chunk stream.
    async fn generate_content_stream(&self, request: GenerateRequest) -> Result<ContentStream>;

    async fn count_tokens(&self, request: CountRequest) -> Result<CountTokensResponse>;

    async fn embed_content(&self, request: EmbedRequest) -> Result<EmbedContentResponse>;

    fn user_tier(&self) -> Option<UserTier> {
        None
    }
}
