//! Retry / failover orchestrator.
//!
//! For each candidate (active model first): retry rate limits with a bounded,
//! increasing backoff; on a missing model or a per-model failure move to the
//! next candidate; on a rejected key stop immediately. The first success is
//! recorded in the selector. When every candidate is spent the last observed
//! failure is reported.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{error, info, warn};

use crate::llm_client::invoker::{FatalCause, GenerationOutcome, ModelInvoker};
use crate::llm_client::request::GenerationRequest;
use crate::llm_client::selector::ModelSelector;
use crate::llm_client::{FailureKind, LlmError, UpstreamFailure};

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Rate-limit retries per candidate; total calls per candidate is this + 1.
    pub max_rate_limit_retries: u32,
    pub backoff_unit: Duration,
    pub max_backoff: Duration,
    /// Overall budget for one `run`; `None` means unbounded.
    pub deadline: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_rate_limit_retries: 2,
            backoff_unit: Duration::from_millis(1000),
            max_backoff: Duration::from_millis(8000),
            deadline: Some(Duration::from_secs(90)),
        }
    }
}

impl RetryPolicy {
    /// Linear backoff: unit × (attempt + 1), capped at `max_backoff`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_unit
            .saturating_mul(attempt.saturating_add(1))
            .min(self.max_backoff)
    }
}

/// What the loop does after one outcome.
#[derive(Debug)]
enum Step {
    Done(String),
    Retry {
        delay: Duration,
        failure: UpstreamFailure,
    },
    NextCandidate(UpstreamFailure),
    Abort(LlmError),
}

fn next_step(model: &str, attempt: u32, outcome: GenerationOutcome, policy: &RetryPolicy) -> Step {
    match outcome {
        GenerationOutcome::Success(text) => Step::Done(text),
        GenerationOutcome::RateLimited(message) => {
            let failure = UpstreamFailure::new(model, FailureKind::RateLimited, message);
            if attempt < policy.max_rate_limit_retries {
                Step::Retry {
                    delay: policy.backoff(attempt),
                    failure,
                }
            } else {
                Step::NextCandidate(failure)
            }
        }
        GenerationOutcome::NotFound(message) => Step::NextCandidate(UpstreamFailure::new(
            model,
            FailureKind::ModelUnavailable,
            message,
        )),
        GenerationOutcome::Fatal(FatalCause::InvalidCredentials(message)) => {
            Step::Abort(LlmError::InvalidCredentials {
                model: model.to_string(),
                message,
            })
        }
        GenerationOutcome::Fatal(FatalCause::Upstream(message)) => {
            Step::NextCandidate(UpstreamFailure::new(model, FailureKind::Fatal, message))
        }
    }
}

pub struct ModelOrchestrator {
    invoker: Arc<dyn ModelInvoker>,
    selector: Arc<ModelSelector>,
    candidates: Vec<String>,
    policy: RetryPolicy,
}

impl ModelOrchestrator {
    pub fn new(
        invoker: Arc<dyn ModelInvoker>,
        selector: Arc<ModelSelector>,
        candidates: Vec<String>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            invoker,
            selector,
            candidates,
            policy,
        }
    }

    pub fn selector(&self) -> &ModelSelector {
        &self.selector
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fails fast with the same error `run` would return for a missing key.
    pub fn ensure_configured(&self) -> Result<(), LlmError> {
        self.invoker.ensure_configured()
    }

    pub fn is_configured(&self) -> bool {
        self.ensure_configured().is_ok()
    }

    /// Candidate order the next `run` would use.
    pub fn candidate_order(&self) -> Vec<String> {
        self.selector.candidate_order(&self.candidates)
    }

    /// Runs the request under the policy's own deadline.
    pub async fn run(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        let deadline = self.policy.deadline.map(|budget| Instant::now() + budget);
        self.run_until(request, deadline).await
    }

    /// Runs the request, giving up once `deadline` has passed. The deadline is
    /// checked before every attempt and before every backoff sleep.
    pub async fn run_until(
        &self,
        request: &GenerationRequest,
        deadline: Option<Instant>,
    ) -> Result<String, LlmError> {
        self.invoker.ensure_configured()?;

        let order = self.candidate_order();
        if order.is_empty() {
            return Err(LlmError::NoCandidates);
        }

        let mut last_failure: Option<UpstreamFailure> = None;

        for model in &order {
            let mut attempt: u32 = 0;

            loop {
                if deadline.is_some_and(|d| Instant::now() >= d) {
                    warn!("Generation deadline reached before trying {model}");
                    return Err(LlmError::DeadlineExceeded { last: last_failure });
                }

                let outcome = self.invoker.invoke(model, request).await;

                match next_step(model, attempt, outcome, &self.policy) {
                    Step::Done(text) => {
                        self.selector.record_success(model);
                        info!(
                            "LLM call succeeded: model={model}, attempt={}, {} chars",
                            attempt + 1,
                            text.len()
                        );
                        return Ok(text);
                    }
                    Step::Retry { delay, failure } => {
                        warn!(
                            "LLM call attempt {} rate limited ({failure}), retrying after {}ms...",
                            attempt + 1,
                            delay.as_millis()
                        );
                        last_failure = Some(failure);

                        if deadline.is_some_and(|d| Instant::now() + delay >= d) {
                            warn!("Backoff would overrun the generation deadline; giving up");
                            return Err(LlmError::DeadlineExceeded { last: last_failure });
                        }
                        sleep(delay).await;
                        attempt += 1;
                    }
                    Step::NextCandidate(failure) => {
                        warn!("Model candidate failed, moving on: {failure}");
                        last_failure = Some(failure);
                        break;
                    }
                    Step::Abort(err) => {
                        error!("Aborting generation: {err}");
                        return Err(err);
                    }
                }
            }
        }

        error!("All {} model candidates failed", order.len());
        match last_failure {
            Some(last) => Err(LlmError::AllCandidatesExhausted {
                tried: order.len(),
                last,
            }),
            None => Err(LlmError::NoCandidates),
        }
    }
}
