//! Generation invoker: one call to one named model, classified into an outcome
//! the orchestrator can act on.
//!
//! The upstream only gives us a status code and an error message, so the
//! classification is string-based. All of it lives in `classify_failure`.

use async_trait::async_trait;

use crate::llm_client::request::GenerationRequest;
use crate::llm_client::LlmError;

/// Fatal outcomes split by blast radius: a bad key stops the whole run,
/// anything else only rules out the current candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FatalCause {
    InvalidCredentials(String),
    Upstream(String),
}

/// Result of one (candidate, attempt). Consumed immediately, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Success(String),
    RateLimited(String),
    NotFound(String),
    Fatal(FatalCause),
}

/// The seam between the orchestrator and the upstream API. Tests swap in a
/// scripted implementation.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    /// Checked once before any network call.
    fn ensure_configured(&self) -> Result<(), LlmError> {
        Ok(())
    }

    async fn invoke(&self, model: &str, request: &GenerationRequest) -> GenerationOutcome;
}

const CREDENTIAL_MARKERS: &[&str] = &[
    "api key not valid",
    "api_key_invalid",
    "invalid api key",
    "api key expired",
    "unauthenticated",
    "unregistered callers",
];

const RATE_LIMIT_MARKERS: &[&str] = &["resource_exhausted", "quota", "rate limit"];

const NOT_FOUND_MARKERS: &[&str] = &["not found", "not_found"];

/// True when `code` appears as a standalone number, e.g. "[429 Too Many Requests]"
/// but not "4290 tokens".
fn mentions_status(message: &str, code: &str) -> bool {
    message
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|token| token == code)
}

/// Maps an upstream failure (HTTP status if any, plus error text) to an outcome.
///
/// Precedence: credentials → rate limit → not found → everything else.
/// 403 without a credential marker means the model is not accessible to this
/// key, which is handled like a missing model.
pub fn classify_failure(status: Option<u16>, message: &str) -> GenerationOutcome {
    let lowered = message.to_lowercase();
    let has = |markers: &[&str]| markers.iter().any(|m| lowered.contains(m));
    let message = message.to_string();

    if status == Some(401) || has(CREDENTIAL_MARKERS) {
        return GenerationOutcome::Fatal(FatalCause::InvalidCredentials(message));
    }
    if status == Some(429) || mentions_status(&lowered, "429") || has(RATE_LIMIT_MARKERS) {
        return GenerationOutcome::RateLimited(message);
    }
    if matches!(status, Some(403) | Some(404))
        || mentions_status(&lowered, "404")
        || has(NOT_FOUND_MARKERS)
    {
        return GenerationOutcome::NotFound(message);
    }
    GenerationOutcome::Fatal(FatalCause::Upstream(message))
}
