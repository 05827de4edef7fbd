//! Adapter-level tests against mock backends: SSE decoding behavior,
//! failure classification, and request building on the wire.

use coderelay::config::{ProviderConfig, ProviderId};
use coderelay::providers::{DeepSeekAdapter, OpenAiAdapter, ProviderAdapter};
use coderelay::types::{Message, ProviderRequest};
use coderelay::RelayError;
use futures_util::StreamExt;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sse_response(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/event-stream")
        .set_body_raw(body.to_string(), "text/event-stream")
}

fn openai_adapter(server: &MockServer) -> OpenAiAdapter {
    let config = ProviderConfig::new(Some("sk-test".into()), server.uri(), "gpt-4o");
    OpenAiAdapter::new(config, reqwest::Client::new())
}

fn request() -> ProviderRequest {
    ProviderRequest::new("system prompt", vec![Message::user("optimize my loop")])
}

async fn collect_deltas(
    adapter: &dyn ProviderAdapter,
    req: &ProviderRequest,
) -> Vec<Result<String, RelayError>> {
    adapter
        .chat_stream(req)
        .await
        .expect("handshake")
        .collect()
        .await
}

#[tokio::test]
async fn deltas_arrive_in_order_and_reassemble_the_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(sse_response(concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"for x \"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"in xs:\"}}]}\n\n",
            "data: [DONE]\n\n",
        )))
        .mount(&server)
        .await;

    let deltas: Vec<String> = collect_deltas(&openai_adapter(&server), &request())
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();
    assert_eq!(deltas, vec!["for x ", "in xs:"]);
    assert_eq!(deltas.concat(), "for x in xs:");
}

#[tokio::test]
async fn malformed_event_line_contributes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(sse_response(concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"first\"}}]}\n\n",
            "data: {broken json!!\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"second\"}}]}\n\n",
            "data: [DONE]\n\n",
        )))
        .mount(&server)
        .await;

    let deltas: Vec<String> = collect_deltas(&openai_adapter(&server), &request())
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();
    assert_eq!(deltas, vec!["first", "second"]);
}

#[tokio::test]
async fn non_success_status_captures_body_as_failure_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let err = openai_adapter(&server)
        .chat_stream(&request())
        .await
        .err()
        .expect("expected Err");
    match err {
        RelayError::ApiError { status, body } => {
            assert_eq!(status, 429);
            assert_eq!(body, "rate limited");
        }
        other => panic!("unexpected error variant: {other:?}"),
    }
}

#[tokio::test]
async fn missing_credential_fails_before_any_network_call() {
    let server = MockServer::start().await;
    // No mock mounted: a request reaching the server would 404 instead.
    let config = ProviderConfig::new(None, server.uri(), "gpt-4o");
    let adapter = OpenAiAdapter::new(config, reqwest::Client::new());

    let err = adapter.chat_stream(&request()).await.err().expect("expected Err");
    assert!(matches!(err, RelayError::MissingApiKey(_)));
    assert_eq!(server.received_requests().await.unwrap_or_default().len(), 0);
}

#[tokio::test]
async fn deepseek_sends_its_own_model_and_sampling_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-ds"))
        .and(body_partial_json(json!({
            "model": "deepseek-coder",
            "stream": true,
            "temperature": 0.7,
            "max_tokens": 2048,
        })))
        .respond_with(sse_response(
            "data: {\"choices\":[{\"delta\":{\"content\":\"ok\"}}]}\n\ndata: [DONE]\n\n",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let config = ProviderConfig::new(Some("sk-ds".into()), server.uri(), "deepseek-coder");
    let adapter = DeepSeekAdapter::new(config, reqwest::Client::new());
    let deltas: Vec<String> = collect_deltas(&adapter, &request())
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();
    assert_eq!(deltas, vec!["ok"]);
    assert_eq!(adapter.id(), ProviderId::DeepSeek);
}

#[tokio::test]
async fn unreachable_backend_surfaces_transport_error() {
    // Nothing listens on this port.
    let config = ProviderConfig::new(Some("sk-test".into()), "http://127.0.0.1:1", "gpt-4o");
    let adapter = OpenAiAdapter::new(config, reqwest::Client::new());

    let err = adapter.chat_stream(&request()).await.err().expect("expected Err");
    assert!(err.is_escalatable(), "transport errors must allow escalation: {err:?}");
}
