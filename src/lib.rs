//! CodeRelay
//!
//! A streaming multi-provider LLM relay. A conversation comes in over HTTP,
//! a backend is selected, and the reply is delivered as an incrementally
//! streamed body regardless of which backend answered, or whether any
//! backend was reachable at all: failed attempts escalate through the
//! configured provider chain and terminate in a deterministic synthetic
//! responder.
//!
//! Module map:
//! - [`types`] — normalized message shapes and the uniform delta stream
//! - [`config`] — provider credentials and chain ordering, read once from env
//! - [`streaming`] — shared SSE decoding for OpenAI-compatible backends
//! - [`providers`] — one adapter per backend
//! - [`synthetic`] — the deterministic fallback responder
//! - [`fallback`] — the per-request attempt chain
//! - [`server`] — the axum transport boundary

pub mod config;
pub mod error;
pub mod fallback;
pub mod providers;
pub mod server;
pub mod streaming;
pub mod synthetic;
pub mod types;

pub use config::{ProviderId, RelayConfig};
pub use error::RelayError;
pub use fallback::FallbackOrchestrator;
pub use server::app;
pub use types::{DeltaStream, Message, MessageRole, ProviderRequest};
