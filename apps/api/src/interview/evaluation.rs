//! Scores one interview answer and proposes a stronger version.

use serde::{Deserialize, Serialize};

use crate::interview::prompts::{EVALUATE_JOB_SECTION, EVALUATE_PROMPT_TEMPLATE};
use crate::llm_client::prompts::{fill_template, JSON_ONLY_INSTRUCTION};
use crate::llm_client::request::truncate_chars;
use crate::llm_client::{GenerationRequest, LlmClient, LlmError, ResponseShape};

pub const MAX_QUESTION_CHARS: usize = 2_000;
pub const MAX_ANSWER_CHARS: usize = 4_000;
pub const MAX_JOB_CHARS: usize = 3_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerEvaluation {
    /// 0 – 10
    pub score: f64,
    pub feedback: String,
    #[serde(default)]
    pub improved_answer: String,
}

pub fn build_evaluation_request(
    question: &str,
    answer: &str,
    job_description: Option<&str>,
) -> GenerationRequest {
    let job_section = job_description
        .map(str::trim)
        .filter(|jd| !jd.is_empty())
        .map(|jd| {
            fill_template(
                EVALUATE_JOB_SECTION,
                &[("job_description", truncate_chars(jd, MAX_JOB_CHARS))],
            )
        })
        .unwrap_or_default();

    let prompt = fill_template(
        EVALUATE_PROMPT_TEMPLATE,
        &[
            ("question", truncate_chars(question, MAX_QUESTION_CHARS)),
            ("answer", truncate_chars(answer, MAX_ANSWER_CHARS)),
            ("job_section", job_section.as_str()),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    );
    GenerationRequest::json(prompt, ResponseShape::AnswerEvaluation)
}

pub async fn evaluate_answer(
    llm: &LlmClient,
    question: &str,
    answer: &str,
    job_description: Option<&str>,
) -> Result<AnswerEvaluation, LlmError> {
    llm.generate_json(&build_evaluation_request(question, answer, job_description))
        .await
}
