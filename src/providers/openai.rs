//! OpenAI adapter

use async_trait::async_trait;
use serde_json::json;

use crate::config::{ProviderConfig, ProviderId};
use crate::error::RelayError;
use crate::types::{DeltaStream, ProviderRequest};

use super::{build_wire_messages, open_completion_stream, ProviderAdapter};

/// Adapter for the OpenAI chat-completions backend.
#[derive(Clone)]
pub struct OpenAiAdapter {
    config: ProviderConfig,
    http_client: reqwest::Client,
}

impl OpenAiAdapter {
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
        })
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::OpenAi
    }

    async fn chat_stream(&self, request: &ProviderRequest) -> Result<DeltaStream, RelayError> {
        let body = self.build_body(request);
        open_completion_stream(&self.http_client, &self.config, self.id(), body).await
    }
}
