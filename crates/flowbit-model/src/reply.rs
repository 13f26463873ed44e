//! Cleanup of raw model replies before JSON decoding.

use once_cell::sync::Lazy;
use regex::Regex;

static FENCE_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^```(?:json)?[ \t]*\r?\n?").unwrap());
static FENCE_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r?\n?```$").unwrap());

/// Strip a Markdown code fence (with or without a `json` tag) wrapping the
/// reply. Content without fences passes through unchanged apart from
/// whitespace trimming.
pub fn strip_code_fence(reply: &str) -> String {
    let trimmed = reply.trim();
    let opened = FENCE_OPEN.replace(trimmed, "");
    let closed = FENCE_CLOSE.replace(&opened, "");
    closed.trim().to_string()
}
