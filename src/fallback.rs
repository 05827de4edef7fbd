//! Fallback Orchestrator
//!
//! Drives the adapter chain for one request: the requested provider first,
//! then the remaining configured providers in fixed order, then the
//! synthetic responder. Escalation is only valid before the first delta has
//! been delivered; once any output exists the attempt is committed and a
//! later stream failure terminates the request instead of re-attempting.
//!
//! Adapter errors are retained for diagnostic logging and never surface
//! verbatim to the caller.

use std::sync::Arc;

use futures_util::StreamExt;

use crate::config::{ProviderId, RelayConfig};
use crate::error::RelayError;
use crate::providers::{DeepSeekAdapter, OpenAiAdapter, ProviderAdapter};
use crate::synthetic::synthetic_stream;
use crate::types::{DeltaStream, ProviderRequest};

/// Per-request attempt chain over the configured adapters.
pub struct FallbackOrchestrator {
    adapters: Vec<Arc<dyn ProviderAdapter>>,
}

impl FallbackOrchestrator {
    pub fn new(adapters: Vec<Arc<dyn ProviderAdapter>>) -> Self {
        Self { adapters }
    }

    /// Build the orchestrator from configuration, one adapter per entry in
    /// the configured provider order.
    pub fn from_config(config: &RelayConfig, http_client: reqwest::Client) -> Self {
        let adapters = config
            .provider_order
            .iter()
            .map(|id| -> Arc<dyn ProviderAdapter> {
                match id {
                    ProviderId::OpenAi => Arc::new(OpenAiAdapter::new(
                        config.openai.clone(),
                        http_client.clone(),
                    )),
                    ProviderId::DeepSeek => Arc::new(DeepSeekAdapter::new(
                        config.deepseek.clone(),
                        http_client.clone(),
                    )),
                }
            })
            .collect();
        Self::new(adapters)
    }

    /// Run the attempt chain and return the single output stream.
    ///
    /// Never fails: the synthetic responder is the terminal stage and always
    /// succeeds. Provenance of the returned stream is not observable.
    pub async fn stream(&self, requested: ProviderId, request: &ProviderRequest) -> DeltaStream {
        for adapter in self.ordered_attempts(requested) {
            let provider = adapter.id();
            match attempt(adapter.as_ref(), request).await {
                Ok(stream) => {
                    tracing::info!(provider = %provider, "streaming from provider");
                    return stream;
                }
                Err(error) => {
                    tracing::warn!(
                        provider = %provider,
                        error = %error,
                        "provider attempt failed before first byte, escalating"
                    );
                }
            }
        }

        tracing::info!("all providers failed, falling back to synthetic responder");
        synthetic_stream(request.prompt())
    }

    /// Attempt order for a request: the requested provider first, then the
    /// remaining configured providers in their fixed order, each at most
    /// once.
    fn ordered_attempts(&self, requested: ProviderId) -> Vec<Arc<dyn ProviderAdapter>> {
        let mut ordered: Vec<Arc<dyn ProviderAdapter>> = Vec::with_capacity(self.adapters.len());
        for adapter in &self.adapters {
            if adapter.id() == requested {
                ordered.insert(0, adapter.clone());
            } else {
                ordered.push(adapter.clone());
            }
        }
        ordered
    }
}

/// Issue one attempt and decide between commit and escalation.
///
/// The attempt's stream is peeked: a failure (or an empty body) before the
/// first delta is a pre-first-byte failure and surfaces as `Err` so the
/// chain can continue. Once a first delta exists the attempt is committed:
/// the delta is re-attached to the front of the stream and any later failure
/// flows through to the caller as a stream-level error.
async fn attempt(
    adapter: &dyn ProviderAdapter,
    request: &ProviderRequest,
) -> Result<DeltaStream, RelayError> {
    let mut stream = adapter.chat_stream(request).await?;

    match stream.next().await {
        Some(Ok(first)) => {
            let committed: DeltaStream =
                Box::pin(futures::stream::iter([Ok(first)]).chain(stream));
            Ok(committed)
        }
        Some(Err(error)) => Err(error),
        None => Err(RelayError::StreamError(format!(
            "{} response body ended before any delta",
            adapter.id()
        ))),
    }
}
