//! Job matching: compares résumé text against a job description.

use serde::{Deserialize, Serialize};

use crate::job::prompts::MATCH_PROMPT_TEMPLATE;
use crate::llm_client::prompts::{fill_template, JSON_ONLY_INSTRUCTION};
use crate::llm_client::request::truncate_chars;
use crate::llm_client::{GenerationRequest, LlmClient, LlmError, ResponseShape};

/// Per-field cap on text sent upstream.
pub const MAX_FIELD_CHARS: usize = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    #[serde(alias = "high", alias = "HIGH")]
    High,
    #[serde(alias = "medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "low", alias = "LOW")]
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatch {
    /// 0 – 100
    pub match_percentage: f64,
    pub match_status: MatchStatus,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub matching_skills: Vec<String>,
    /// 0 – 10
    pub culture_fit_score: f64,
    pub advice: String,
}

pub fn build_match_request(resume_text: &str, job_description: &str) -> GenerationRequest {
    let prompt = fill_template(
        MATCH_PROMPT_TEMPLATE,
        &[
            ("resume_text", truncate_chars(resume_text, MAX_FIELD_CHARS)),
            (
                "job_description",
                truncate_chars(job_description, MAX_FIELD_CHARS),
            ),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    );
    GenerationRequest::json(prompt, ResponseShape::JobMatch)
}

pub async fn match_job(
    llm: &LlmClient,
    resume_text: &str,
    job_description: &str,
) -> Result<JobMatch, LlmError> {
    let request = build_match_request(resume_text, job_description);
    llm.generate_json::<JobMatch>(&request).await
}
