//! Synthetic Responder
//!
//! Deterministic, network-free fallback used when every configured backend
//! fails. Given the latest user prompt it produces a canned code-analysis
//! reply (echoing the first fenced code block when one is present), then
//! emits it as fixed-size fragments with a fixed inter-fragment delay so the
//! transport sees the same shape of stream a real backend would produce.

use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::DeltaStream;

/// Fragment size in characters. The final fragment may be shorter.
pub const FRAGMENT_CHARS: usize = 20;

/// Pause between fragments, emulating incremental delivery.
pub const FRAGMENT_DELAY: Duration = Duration::from_millis(50);

/// Fixed disclaimer appended to every synthetic reply.
pub const DISCLAIMER: &str = "**Note**: This is a demo response as both OpenAI and DeepSeek APIs \
are currently unavailable. Please try again later when the services are restored.";

lazy_static! {
    /// First fenced code block: optional language tag, then the body up to
    /// the closing fence.
    static ref CODE_FENCE: Regex =
        Regex::new(r"```([a-zA-Z]*)\n([\s\S]*?)```").expect("valid code fence pattern");
}

/// Build the full synthetic reply for a prompt. Deterministic: the same
/// prompt always produces byte-identical output.
pub fn generate_reply(prompt: &str) -> String {
    match CODE_FENCE.captures(prompt) {
        Some(caps) => {
            let language = match caps.get(1).map(|m| m.as_str()) {
                Some("") | None => "javascript",
                Some(tag) => tag,
            };
            let code = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            let complexity = if code.len() < 100 {
                "quite short and simple"
            } else {
                "moderately complex"
            };
            format!(
                "I've analyzed your {language} code and found some potential optimizations:\n\n\
                 ## Analysis\n\n\
                 The code appears to be {complexity}. Here are some observations:\n\n\
                 1. **Structure**: The overall structure is sound.\n\
                 2. **Performance**: There are some minor performance optimizations possible.\n\
                 3. **Best Practices**: Some code style improvements could be made to follow modern standards.\n\n\
                 ## Suggested Improvements\n\n\
                 Here's the code I analyzed:\n\n\
                 ```{language}\n{code}\n```\n\n\
                 {DISCLAIMER}",
                code = code.trim(),
            )
        }
        None => format!(
            "Thank you for your question about code optimization.\n\n\
             To provide specific optimization advice, I would need to see the code you're \
             working with. Could you please share the code snippet you'd like me to analyze?\n\n\
             You can format your code using markdown code blocks like this:\n\n\
             ```javascript\n\
             // Your code here\n\
             function example() {{\n  console.log(\"Hello world\");\n}}\n\
             ```\n\n\
             {DISCLAIMER}"
        ),
    }
}

/// Split a reply into fragments of [`FRAGMENT_CHARS`] characters.
pub fn chunk_fragments(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(FRAGMENT_CHARS)
        .map(|c| c.iter().collect())
        .collect()
}

/// Produce the synthetic delta stream for a prompt.
///
/// Always succeeds; from the transport's perspective it is indistinguishable
/// from a real backend's stream except for its uniform pacing.
pub fn synthetic_stream(prompt: &str) -> DeltaStream {
    let fragments = chunk_fragments(&generate_reply(prompt));
    let out = async_stream::stream! {
        for fragment in fragments {
            yield Ok(fragment);
            tokio::time::sleep(FRAGMENT_DELAY).await;
        }
    };
    Box::pin(out)
}
