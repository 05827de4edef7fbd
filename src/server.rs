//! Transport Boundary
//!
//! Exposes the orchestrator over HTTP: `POST /api/chat` streams the relay
//! output as a continuously-flushed plain-text body, `GET /api/health`
//! reports which providers have credentials configured. Internal errors are
//! translated into status codes here and never leak adapter detail.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures_util::StreamExt;
use serde::Deserialize;
use serde_json::json;

use crate::config::{ProviderId, RelayConfig};
use crate::error::RelayError;
use crate::fallback::FallbackOrchestrator;
use crate::types::{normalize_messages, ProviderRequest};

/// Shared per-process state; nothing in it is mutable across requests.
#[derive(Clone)]
pub struct AppState {
    config: Arc<RelayConfig>,
    orchestrator: Arc<FallbackOrchestrator>,
}

impl AppState {
    pub fn new(config: RelayConfig, http_client: reqwest::Client) -> Self {
        let orchestrator = FallbackOrchestrator::from_config(&config, http_client);
        Self {
            config: Arc::new(config),
            orchestrator: Arc::new(orchestrator),
        }
    }
}

/// Build the relay router.
pub fn app(config: RelayConfig) -> Router {
    let state = AppState::new(config, reqwest::Client::new());
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/health", get(health))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct ChatBody {
    #[serde(default)]
    messages: Vec<serde_json::Value>,
    #[serde(default)]
    model: Option<String>,
}

async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "rejecting malformed request body");
            return error_response(
                StatusCode::BAD_REQUEST,
                json!({"error": "Invalid JSON in request body"}),
            );
        }
    };

    let messages = match normalize_messages(&body.messages) {
        Ok(messages) => messages,
        Err(RelayError::InvalidInput(msg)) => {
            return error_response(StatusCode::BAD_REQUEST, json!({"error": msg}));
        }
        Err(other) => return internal_error(other),
    };

    let requested =
        ProviderId::parse_or_default(body.model.as_deref(), state.config.default_provider);
    tracing::info!(provider = %requested, messages = messages.len(), "dispatching chat request");

    let request = ProviderRequest::new(state.config.system_prompt.clone(), messages);
    let stream = state.orchestrator.stream(requested, &request).await;

    // Adapter detail is logged, never forwarded; a post-first-byte failure
    // aborts the body with a generic stream error.
    let body_stream = stream.map(|item| match item {
        Ok(delta) => Ok(axum::body::Bytes::from(delta)),
        Err(error) => {
            tracing::error!(error = %error, "stream failed after output began");
            Err(RelayError::StreamError(
                "stream terminated unexpectedly".to_string(),
            ))
        }
    });

    match Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(header::CACHE_CONTROL, "no-cache, no-transform")
        .header("x-accel-buffering", "no")
        .body(Body::from_stream(body_stream))
    {
        Ok(response) => response,
        Err(e) => internal_error(RelayError::InternalError(e.to_string())),
    }
}

async fn health(State(state): State<AppState>) -> Response {
    let configured = |id: ProviderId| {
        if state.config.provider(id).has_api_key() {
            "configured"
        } else {
            "missing"
        }
    };

    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "services": {
            "openai": configured(ProviderId::OpenAi),
            "deepseek": configured(ProviderId::DeepSeek),
        },
    }))
    .into_response()
}

fn error_response(status: StatusCode, body: serde_json::Value) -> Response {
    (status, Json(body)).into_response()
}

/// The orchestrator's synthetic terminal stage always succeeds, so chat
/// requests should never reach this.
fn internal_error(error: RelayError) -> Response {
    tracing::error!(error = %error, "unexpected relay failure");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({
            "error": "Error processing your request",
            "details": error.to_string(),
        }),
    )
}
