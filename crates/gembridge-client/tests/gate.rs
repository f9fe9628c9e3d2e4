//! Availability gating: disabled endpoints either fail terminally or
//! substitute their documented fallback without touching the network.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use futures_util::{StreamExt, stream};

use gembridge_client::{EndpointGate, estimate_contents};
use gembridge_core::{
    ContentGenerator, ContentStream, CountRequest, EmbedRequest, EndpointAvailability,
    GatewayError, GenerateRequest, Result,
};
use gembridge_protocol::gemini::count_tokens::CountTokensResponse;
use gembridge_protocol::gemini::embed_content::EmbedContentResponse;
use gembridge_protocol::gemini::generate_content::{Candidate, GenerateContentResponse};
use gembridge_protocol::gemini::types::Content;

#[derive(Default)]
struct StubGenerator {
    generate_calls: AtomicUsize,
    stream_calls: AtomicUsize,
    count_calls: AtomicUsize,
    embed_calls: AtomicUsize,
}

fn stub_response(marker: &str) -> GenerateContentResponse {
    GenerateContentResponse {
        candidates: Some(vec![Candidate {
            content: Some(Content::model(marker)),
            finish_reason: Some("STOP".into()),
            index: None,
            safety_ratings: None,
            extra: serde_json::Map::new(),
        }]),
        ..GenerateContentResponse::default()
    }
}

#[async_trait]
impl ContentGenerator for StubGenerator {
    async fn generate_content(&self, _request: GenerateRequest) -> Result<GenerateContentResponse> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        Ok(stub_response("from-generate"))
    }

    async fn generate_content_stream(&self, _request: GenerateRequest) -> Result<ContentStream> {
        self.stream_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Box::pin(stream::iter([Ok(stub_response("from-stream"))])))
    }

    async fn count_tokens(&self, _request: CountRequest) -> Result<CountTokensResponse> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        Ok(CountTokensResponse::new(999))
    }

    async fn embed_content(&self, _request: EmbedRequest) -> Result<EmbedContentResponse> {
        self.embed_calls.fetch_add(1, Ordering::SeqCst);
        Ok(EmbedContentResponse::default())
    }
}

fn first_text(response: &GenerateContentResponse) -> &str {
    response.candidates.as_ref().unwrap()[0]
        .content
        .as_ref()
        .unwrap()
        .parts[0]
        .text
        .as_deref()
        .unwrap()
}

#[tokio::test]
async fn disabled_generate_fails_terminally() {
    let stub = Arc::new(StubGenerator::default());
    let gate = EndpointGate::new(
        stub.clone(),
        EndpointAvailability {
            generate_content: false,
            ..EndpointAvailability::default()
        },
    );

    for _ in 0..3 {
        let err = gate
            .generate_content(GenerateRequest::new(vec![Content::user("hi")]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GatewayError::EndpointDisabled {
                operation: "generateContent"
            }
        ));
    }
    assert_eq!(stub.generate_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn disabled_embed_fails_terminally() {
    let stub = Arc::new(StubGenerator::default());
    let gate = EndpointGate::new(
        stub.clone(),
        EndpointAvailability {
            embed_content: false,
            ..EndpointAvailability::default()
        },
    );

    let err = gate
        .embed_content(EmbedRequest::new(Content::user("hi")))
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::EndpointDisabled { .. }));
    assert_eq!(stub.embed_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn disabled_count_tokens_returns_estimate_without_delegating() {
    let stub = Arc::new(StubGenerator::default());
    let gate = EndpointGate::new(
        stub.clone(),
        EndpointAvailability {
            count_tokens: false,
            ..EndpointAvailability::default()
        },
    );

    let contents = vec![Content::user("hello world")];
    let response = gate
        .count_tokens(CountRequest::new(contents.clone()))
        .await
        .unwrap();
    assert_eq!(response.total_tokens, estimate_contents(&contents));
    assert_eq!(stub.count_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn disabled_stream_wraps_generate_as_single_chunk() {
    let stub = Arc::new(StubGenerator::default());
    let gate = EndpointGate::new(
        stub.clone(),
        EndpointAvailability {
            generate_content_stream: false,
            ..EndpointAvailability::default()
        },
    );

    let stream = gate
        .generate_content_stream(GenerateRequest::new(vec![Content::user("hi")]))
        .await
        .unwrap();
    let chunks: Vec<_> = stream.collect().await;
    assert_eq!(chunks.len(), 1);
    assert_eq!(first_text(chunks[0].as_ref().unwrap()), "from-generate");
    assert_eq!(stub.stream_calls.load(Ordering::SeqCst), 0);
    assert_eq!(stub.generate_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn enabled_endpoints_delegate_untouched() {
    let stub = Arc::new(StubGenerator::default());
    let gate = EndpointGate::new(stub.clone(), EndpointAvailability::default());

    let response = gate
        .generate_content(GenerateRequest::new(vec![Content::user("hi")]))
        .await
        .unwrap();
    assert_eq!(first_text(&response), "from-generate");

    let stream = gate
        .generate_content_stream(GenerateRequest::new(vec![Content::user("hi")]))
        .await
        .unwrap();
    let chunks: Vec<_> = stream.collect().await;
    assert_eq!(first_text(chunks[0].as_ref().unwrap()), "from-stream");

    let count = gate
        .count_tokens(CountRequest::new(vec![Content::user("hi")]))
        .await
        .unwrap();
    assert_eq!(count.total_tokens, 999);

    gate.embed_content(EmbedRequest::new(Content::user("hi")))
        .await
        .unwrap();

    assert_eq!(stub.generate_calls.load(Ordering::SeqCst), 1);
    assert_eq!(stub.stream_calls.load(Ordering::SeqCst), 1);
    assert_eq!(stub.count_calls.load(Ordering::SeqCst), 1);
    assert_eq!(stub.embed_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn gate_reports_inner_tier() {
    let stub = Arc::new(StubGenerator::default());
    let gate = EndpointGate::new(stub, EndpointAvailability::default());
    assert_eq!(gate.user_tier(), None);
}
