//! Error Handling
//!
//! Central error type for the relay. Adapter-side failures are classified so
//! the fallback orchestrator can decide whether escalating to the next
//! provider is still possible.

use thiserror::Error;

/// Main error type for the relay.
#[derive(Error, Debug)]
pub enum RelayError {
    /// Malformed top-level input; fatal to the request, no streaming started.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The adapter has no credential configured.
    #[error("API key is not configured for provider '{0}'")]
    MissingApiKey(String),

    /// Non-success HTTP status from a backend call.
    #[error("API error {status}: {body}")]
    ApiError { status: u16, body: String },

    /// Transport-level HTTP failure (connect, send, read).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The streaming handshake exceeded its deadline.
    #[error("Timeout error: {0}")]
    TimeoutError(String),

    /// The stream failed or ended before delivering what was expected.
    #[error("Stream error: {0}")]
    StreamError(String),

    /// A single event line could not be parsed. Recovered by skipping inside
    /// the decoder; surfaced only when a whole payload is unusable.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(String),

    /// Catch-all for conditions that should be structurally impossible.
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl RelayError {
    /// Convenience constructor mirroring the `ApiError` shape.
    pub fn api_error(status: u16, body: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            body: body.into(),
        }
    }

    /// Whether the fallback orchestrator may escalate to another provider
    /// after this error. Only pre-first-byte adapter failures qualify;
    /// validation and internal errors are terminal.
    pub fn is_escalatable(&self) -> bool {
        matches!(
            self,
            Self::MissingApiKey(_)
                | Self::ApiError { .. }
                | Self::HttpError(_)
                | Self::TimeoutError(_)
                | Self::StreamError(_)
        )
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::TimeoutError(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}
