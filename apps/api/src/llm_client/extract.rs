//! JSON extraction from free-form model output.
//!
//! Models wrap JSON in prose or markdown fences even when told not to. The
//! recovery is deliberately simple: take the span from the first `{` to the
//! last `}` and parse it. This is not a balanced-brace scanner; text such as
//! `{"a":1} and {"b":2}` yields an unparseable span and falls through.

use serde_json::Value;

use crate::llm_client::LlmError;

/// Recovers the JSON object embedded in `raw`, or fails with the offending
/// text attached. Pure; no I/O.
pub fn extract_json(raw: &str) -> Result<Value, LlmError> {
    let span = outermost_brace_span(raw);
    let mut last_reason = "no JSON object found".to_string();

    if let Some(span) = span {
        match serde_json::from_str::<Value>(span) {
            Ok(value) => return Ok(value),
            Err(e) => last_reason = e.to_string(),
        }
    }

    // Fallback for output with no brace span at all
    let stripped = strip_json_fences(raw);
    match serde_json::from_str::<Value>(stripped) {
        Ok(value) if value.is_object() => return Ok(value),
        Ok(_) => last_reason = "model output is JSON but not an object".to_string(),
        Err(e) if span.is_none() => last_reason = e.to_string(),
        Err(_) => {}
    }

    Err(LlmError::MalformedModelOutput {
        reason: last_reason,
        raw: raw.to_string(),
    })
}

/// Greedy span from the first `{` to the last `}` inclusive.
fn outermost_brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```JSON"))
        .or_else(|| text.strip_prefix("```"));

    match inner {
        Some(stripped) => {
            let stripped = stripped.trim_start();
            stripped
                .strip_suffix("```")
                .map(str::trim)
                .unwrap_or(stripped)
        }
        None => text,
    }
}
