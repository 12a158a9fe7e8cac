/// LLM Client: the single point of entry for all Gemini calls in Hirewise.
///
/// ARCHITECTURAL RULE: No other module may call the Generative Language API directly.
/// Feature modules build a `GenerationRequest` and hand it to `LlmClient`.
///
/// Flow: selector (candidate order) → orchestrator (retry / failover over the
/// invoker) → extractor (JSON recovery) → caller's typed shape.
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

pub mod extract;
pub mod gemini;
pub mod invoker;
pub mod orchestrator;
pub mod prompts;
pub mod request;
pub mod selector;

pub use extract::extract_json;
pub use gemini::GeminiClient;
pub use orchestrator::{ModelOrchestrator, RetryPolicy};
pub use request::{Attachment, ExpectedOutput, GenerationRequest, ResponseShape};
pub use selector::ModelSelector;

/// Why a single candidate stopped being useful for the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    RateLimited,
    ModelUnavailable,
    Fatal,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureKind::RateLimited => "rate limited",
            FailureKind::ModelUnavailable => "model unavailable",
            FailureKind::Fatal => "upstream failure",
        };
        f.write_str(label)
    }
}

/// A failure observed for one (candidate, attempt) pair. Absorbed by the
/// orchestrator; only the last one surfaces, inside a terminal `LlmError`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{model}: {kind}: {message}")]
pub struct UpstreamFailure {
    pub model: String,
    pub kind: FailureKind,
    pub message: String,
}

impl UpstreamFailure {
    pub fn new(model: &str, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            model: model.to_string(),
            kind,
            message: message.into(),
        }
    }
}

/// Terminal errors that cross the LLM client boundary.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("GEMINI_API_KEY is not set. Add it to the server environment or .env file and restart.")]
    MissingApiKey,

    #[error("The API key was rejected while calling {model}: {message}. Check GEMINI_API_KEY.")]
    InvalidCredentials { model: String, message: String },

    #[error("No model candidates configured. Set GEMINI_MODELS to a comma-separated list.")]
    NoCandidates,

    #[error("All {tried} model candidates failed; last error: {last}")]
    AllCandidatesExhausted { tried: usize, last: UpstreamFailure },

    #[error("Generation deadline exceeded before any model candidate succeeded")]
    DeadlineExceeded { last: Option<UpstreamFailure> },

    #[error("Model output is not valid JSON: {reason}")]
    MalformedModelOutput { reason: String, raw: String },

    #[error("Upstream {operation} request was rate limited: {message}")]
    RateLimited {
        operation: &'static str,
        message: String,
    },

    #[error("Upstream {operation} request failed: {message}")]
    Upstream {
        operation: &'static str,
        message: String,
    },
}

/// The LLM client shared by all handlers. Wraps the orchestrator with the
/// raw-text and JSON output helpers.
#[derive(Clone)]
pub struct LlmClient {
    orchestrator: Arc<ModelOrchestrator>,
}

impl LlmClient {
    pub fn new(orchestrator: ModelOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }

    pub fn orchestrator(&self) -> &ModelOrchestrator {
        &self.orchestrator
    }

    /// Runs the request and returns the model's text untouched (trimmed).
    pub async fn generate_text(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        let text = self.orchestrator.run(request).await?;
        Ok(text.trim().to_string())
    }

    /// Runs the request, extracts the embedded JSON object and deserializes it
    /// into the caller's shape. A shape mismatch is reported as malformed output.
    pub async fn generate_json<T: DeserializeOwned>(
        &self,
        request: &GenerationRequest,
    ) -> Result<T, LlmError> {
        let text = self.orchestrator.run(request).await?;
        let value = extract_json(&text)?;

        let shape = match request.expects() {
            ExpectedOutput::Json(shape) => shape.as_str(),
            ExpectedOutput::RawText => "json",
        };
        debug!("Extracted JSON for {shape} ({} chars of model output)", text.len());

        serde_json::from_value(value).map_err(|e| LlmError::MalformedModelOutput {
            reason: format!("response does not match the {shape} shape: {e}"),
            raw: text,
        })
    }
}
