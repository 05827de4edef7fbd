//! Core Types
//!
//! Message shapes shared by the normalizer, the provider adapters, and the
//! fallback orchestrator, plus the uniform delta stream every attempt yields.

use std::pin::Pin;

use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::error::RelayError;

/// Message role.
///
/// Anything outside this set is coerced to `User` during normalization.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// A single normalized conversation message.
///
/// Invariant: `role` and `content` are always present. Loosely-typed inbound
/// records never flow past [`normalize_messages`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }
}

/// Request handed to a provider adapter for one attempt.
///
/// Provider-specific encoding happens inside the adapter and never leaks out.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub system_prompt: String,
    pub messages: Vec<Message>,
}

impl ProviderRequest {
    pub fn new(system_prompt: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            messages,
        }
    }

    /// The most recent user message, used only by the synthetic responder.
    pub fn prompt(&self) -> &str {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.as_str())
            .unwrap_or("")
    }
}

/// Delta Stream - the uniform output of every attempt.
///
/// A pinned, boxed stream of assistant text fragments in strict arrival
/// order, with no semantic boundary guarantees (fragments may split words or
/// code-fence markers).
pub type DeltaStream = Pin<Box<dyn Stream<Item = Result<String, RelayError>> + Send>>;

/// Validate and coerce arbitrary inbound conversation data.
///
/// The only hard rejection is an empty sequence. Per-message fields are
/// always coercible: an unrecognized or missing role becomes `user`, a
/// non-text or missing content becomes the empty string.
pub fn normalize_messages(raw: &[serde_json::Value]) -> Result<Vec<Message>, RelayError> {
    if raw.is_empty() {
        return Err(RelayError::InvalidInput(
            "messages must be a non-empty array".to_string(),
        ));
    }

    let normalized = raw
        .iter()
        .map(|value| {
            let role = match value.get("role").and_then(|r| r.as_str()) {
                Some("assistant") => MessageRole::Assistant,
                Some("system") => MessageRole::System,
                _ => MessageRole::User,
            };
            let content = value
                .get("content")
                .and_then(|c| c.as_str())
                .unwrap_or("")
                .to_string();
            Message { role, content }
        })
        .collect();

    Ok(normalized)
}
