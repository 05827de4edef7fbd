//! Relay Configuration
//!
//! Credentials and endpoints are read from the environment once at startup
//! into an explicit structure that is injected into each provider adapter.
//! A missing key is a recoverable per-adapter failure, not a startup failure.

use std::env;

use serde::{Deserialize, Serialize};

/// Identifier of a configured backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    OpenAi,
    DeepSeek,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::DeepSeek => "deepseek",
        }
    }

    /// Parse a caller-supplied selector. Unknown or absent selectors fall
    /// back to the configured primary provider.
    pub fn parse_or_default(selector: Option<&str>, default: ProviderId) -> ProviderId {
        match selector {
            Some("openai") => Self::OpenAi,
            Some("deepseek") => Self::DeepSeek,
            _ => default,
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-provider connection settings.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl ProviderConfig {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    /// Whether a syntactically present credential is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

/// Full relay configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub openai: ProviderConfig,
    pub deepseek: ProviderConfig,
    /// Provider attempted when the caller does not select one.
    pub default_provider: ProviderId,
    /// Fixed escalation order; each provider is attempted at most once.
    pub provider_order: Vec<ProviderId>,
    /// System prompt prepended to every backend request.
    pub system_prompt: String,
}

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com/v1";

const SYSTEM_PROMPT: &str = "You are CodeOptimizer, an AI assistant specialized in optimizing and fixing code.\n\
- Analyze code for inefficiencies, bugs, and potential improvements\n\
- Suggest better algorithms, data structures, and patterns\n\
- Explain your reasoning clearly and concisely\n\
- Provide optimized code examples when appropriate\n\
- Focus on best practices and modern coding standards\n\
- Be specific about performance improvements";

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            openai: ProviderConfig::new(None, DEFAULT_OPENAI_BASE_URL, "gpt-4o"),
            deepseek: ProviderConfig::new(None, DEFAULT_DEEPSEEK_BASE_URL, "deepseek-coder"),
            default_provider: ProviderId::OpenAi,
            provider_order: vec![ProviderId::OpenAi, ProviderId::DeepSeek],
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }
}

impl RelayConfig {
    /// Read configuration from the process environment.
    ///
    /// `OPENAI_API_KEY` / `DEEPSEEK_API_KEY` provide credentials;
    /// `OPENAI_BASE_URL` / `DEEPSEEK_BASE_URL` override endpoints, which is
    /// mainly useful for pointing the relay at a mock server.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.openai.api_key = env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty());
        config.deepseek.api_key = env::var("DEEPSEEK_API_KEY").ok().filter(|k| !k.is_empty());
        if let Ok(url) = env::var("OPENAI_BASE_URL") {
            config.openai.base_url = url;
        }
        if let Ok(url) = env::var("DEEPSEEK_BASE_URL") {
            config.deepseek.base_url = url;
        }
        config
    }

    pub fn provider(&self, id: ProviderId) -> &ProviderConfig {
        match id {
            ProviderId::OpenAi => &self.openai,
            ProviderId::DeepSeek => &self.deepseek,
        }
    }
}
