//! DeepSeek adapter
//!
//! DeepSeek speaks the OpenAI-compatible wire format, so this adapter reuses
//! the shared request/decode path and only supplies its own endpoint, model,
//! and sampling parameters.

use async_trait::async_trait;
use serde_json::json;

use crate::config::{ProviderConfig, ProviderId};
use crate::error::RelayError;
use crate::types::{DeltaStream, ProviderRequest};

use super::{build_wire_messages, open_completion_stream, ProviderAdapter};

/// Adapter for the DeepSeek chat-completions backend.
#[derive(Clone)]
pub struct DeepSeekAdapter {
    config: ProviderConfig,
    http_client: reqwest::Client,
}

impl DeepSeekAdapter {
    pub fn new(config: ProviderConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    fn build_body(&self, request: &ProviderRequest) -> serde_json::Value {
        json!({
            "model": self.config.model,
            "messages": build_wire_messages(request),
            "stream": true,
            "temperature": 0.7,
            "max_tokens": 2048,
        })
    }
}

#[async_trait]
impl ProviderAdapter for DeepSeekAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::DeepSeek
    }

    async fn chat_stream(&self, request: &ProviderRequest) -> Result<DeltaStream, RelayError> {
        let body = self.build_body(request);
        open_completion_stream(&self.http_client, &self.config, self.id(), body).await
    }
}
