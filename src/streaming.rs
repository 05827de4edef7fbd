//! SSE Delta Decoding
//!
//! One reusable decoder for backends that speak the OpenAI-compatible
//! streaming wire format: Server-Sent-Event framing where each `data:`
//! payload is a chat-completion chunk and `[DONE]` terminates the stream.
//!
//! The underlying [`eventsource_stream`] parser is stateful across network
//! reads, so a chunk boundary splitting a multi-byte character or splitting a
//! line across two reads is reassembled correctly.

use eventsource_stream::Eventsource;
use futures_util::Stream;
use futures_util::StreamExt;
use serde::Deserialize;

use crate::config::ProviderId;
use crate::error::RelayError;
use crate::types::DeltaStream;

/// SSE `data` payload that signals end-of-stream without being emitted.
const DONE_MARKER: &str = "[DONE]";

/// One chat-completion chunk as emitted by OpenAI-compatible backends.
#[derive(Debug, Deserialize)]
struct ChatCompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: Option<ChunkDelta>,
}

#[derive(Debug, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionChunk {
    fn content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()?
            .delta?
            .content
            .filter(|c| !c.is_empty())
    }
}

/// Decode a byte stream of SSE frames into a stream of text deltas.
///
/// - Payloads equal to `[DONE]` end the stream without being emitted.
/// - Empty payloads (keep-alives) are ignored.
/// - Payloads that fail to parse as a chat-completion chunk are skipped and
///   logged for diagnostics; a bad line never aborts the stream.
/// - A transport error from the underlying byte stream terminates the stream
///   with a single error item.
pub fn decode_sse_deltas<S, B, E>(byte_stream: S, provider: ProviderId) -> DeltaStream
where
    S: Stream<Item = Result<B, E>> + Send + Unpin + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let out = async_stream::stream! {
        let mut events = byte_stream.eventsource();

        while let Some(item) = events.next().await {
            let event = match item {
                Ok(ev) => ev,
                Err(e) => {
                    yield Err(RelayError::StreamError(format!(
                        "SSE stream error ({provider}): {e}"
                    )));
                    return;
                }
            };

            let data = event.data.trim();
            if data.is_empty() {
                continue;
            }
            if data == DONE_MARKER {
                return;
            }

            match serde_json::from_str::<ChatCompletionChunk>(data) {
                Ok(chunk) => {
                    if let Some(content) = chunk.content() {
                        yield Ok(content);
                    }
                }
                Err(e) => {
                    tracing::debug!(provider = %provider, error = %e, "skipping unparsable SSE line");
                }
            }
        }
    };

    Box::pin(out)
}

/// Decode a backend HTTP response into a delta stream.
///
/// The response status has already been checked by the adapter; this only
/// handles the body.
pub fn decode_response_deltas(response: reqwest::Response, provider: ProviderId) -> DeltaStream {
    decode_sse_deltas(Box::pin(response.bytes_stream()), provider)
}
