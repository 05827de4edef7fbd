//! Provider Adapters
//!
//! One adapter per backend. Every adapter translates between the uniform
//! internal request model and its backend's wire protocol; retry and
//! escalation live exclusively in the fallback orchestrator.

mod deepseek;
mod openai;

pub use deepseek::DeepSeekAdapter;
pub use openai::OpenAiAdapter;

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::config::{ProviderConfig, ProviderId};
use crate::error::RelayError;
use crate::streaming::decode_response_deltas;
use crate::types::{DeltaStream, MessageRole, ProviderRequest};

/// Deadline for the streaming handshake (request send + response headers).
/// Reading the body has no overall deadline; long generations are legitimate.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(30);

/// Capability every backend adapter implements.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Issue one streaming completion attempt.
    ///
    /// On success the returned stream yields text deltas in arrival order.
    /// All failure modes (missing credential, non-success status, transport
    /// errors) surface as `Err`; the adapter never retries.
    async fn chat_stream(&self, request: &ProviderRequest) -> Result<DeltaStream, RelayError>;
}

/// Message in the OpenAI-compatible wire shape.
#[derive(Debug, Serialize)]
pub(crate) struct WireMessage {
    role: &'static str,
    content: String,
}

/// Build the wire-level message list for an attempt.
///
/// The system prompt is prepended as the first message when non-empty.
/// Conversation messages pass through filtered to `user`/`assistant`; system
/// entries inside the conversation are dropped to avoid duplicate system
/// instructions.
pub(crate) fn build_wire_messages(request: &ProviderRequest) -> Vec<WireMessage> {
    let mut wire = Vec::with_capacity(request.messages.len() + 1);
    if !request.system_prompt.is_empty() {
        wire.push(WireMessage {
            role: "system",
            content: request.system_prompt.clone(),
        });
    }
    for message in &request.messages {
        let role = match message.role {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::System => continue,
        };
        wire.push(WireMessage {
            role,
            content: message.content.clone(),
        });
    }
    wire
}

/// Shared HTTP path for OpenAI-compatible backends: credential check, POST to
/// `{base_url}/chat/completions`, status check with the error body captured,
/// then SSE decoding of the response body.
pub(crate) async fn open_completion_stream(
    http_client: &reqwest::Client,
    config: &ProviderConfig,
    provider: ProviderId,
    body: serde_json::Value,
) -> Result<DeltaStream, RelayError> {
    let api_key = config
        .api_key
        .as_deref()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| RelayError::MissingApiKey(provider.to_string()))?;

    let url = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
    tracing::debug!(provider = %provider, url = %url, "issuing streaming completion request");

    let send = http_client
        .post(&url)
        .bearer_auth(api_key)
        .json(&body)
        .send();

    let response = tokio::time::timeout(HANDSHAKE_TIMEOUT, send)
        .await
        .map_err(|_| {
            RelayError::TimeoutError(format!(
                "{provider} streaming handshake exceeded {}s",
                HANDSHAKE_TIMEOUT.as_secs()
            ))
        })??;

    let status = response.status();
    if !status.is_success() {
        let detail = response.text().await.unwrap_or_default();
        return Err(RelayError::api_error(status.as_u16(), detail));
    }

    Ok(decode_response_deltas(response, provider))
}
