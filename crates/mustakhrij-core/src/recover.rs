//! Best-effort recovery of a JSON value from free-text model replies
//!
//! Model output frequently wraps the requested JSON in prose or markdown
//! code fences. Recovery is staged: each stage is attempted only if the
//! previous one failed, and the function either returns a value that parsed
//! cleanly or a typed failure carrying the raw text.

use serde_json::Value;

use crate::error::Error;
use crate::error::Result;

/// Recover a JSON value from a raw model reply.
///
/// Stages, in order:
/// 1. parse the whole trimmed text;
/// 2. strip leading/trailing markdown code fences and re-parse;
/// 3. parse the substring from the first `{` to the last `}` inclusive.
///
/// The brace slice is greedy, not nested-brace-aware: prose containing its
/// own braces around the JSON defeats it. See the tests.
pub fn recover_json(raw: &str) -> Result<Value> {
    let trimmed = raw.trim();

    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }

    if let Ok(value) = serde_json::from_str(strip_fences(trimmed)) {
        return Ok(value);
    }

    if let Some(slice) = brace_slice(trimmed) {
        if let Ok(value) = serde_json::from_str(slice) {
            return Ok(value);
        }
    }

    Err(Error::ExtractionFailed {
        raw: raw.to_string(),
    })
}

/// Drop a leading ```` ```json ````/```` ``` ```` line and a trailing
/// ```` ``` ```` marker, if present
fn strip_fences(text: &str) -> &str {
    let mut s = text.trim();
    if let Some(rest) = s.strip_prefix("```") {
        // the info string ("json") runs to the end of the fence line
        s = match rest.find('\n') {
            Some(i) => &rest[i + 1..],
            None => rest,
        };
    }
    if let Some(rest) = s.trim_end().strip_suffix("```") {
        s = rest;
    }
    s.trim()
}

/// Substring from the first `{` to the last `}`, inclusive
fn brace_slice(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}
