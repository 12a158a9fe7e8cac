//! LinkedIn profile rewrite.

use serde::{Deserialize, Serialize};

use crate::job::prompts::LINKEDIN_PROMPT_TEMPLATE;
use crate::llm_client::prompts::{fill_template, JSON_ONLY_INSTRUCTION};
use crate::llm_client::request::truncate_chars;
use crate::llm_client::{GenerationRequest, LlmClient, LlmError, ResponseShape};

pub const MAX_RESUME_CHARS: usize = 5_000;

/// Models return bullet points either as one newline-joined string or as a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BulletPoints {
    Text(String),
    List(Vec<String>),
}

impl Default for BulletPoints {
    fn default() -> Self {
        BulletPoints::Text(String::new())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedInExperience {
    pub company: String,
    #[serde(default)]
    pub bullet_points: BulletPoints,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedInProfile {
    pub headline: String,
    pub about: String,
    #[serde(default)]
    pub experience: Vec<LinkedInExperience>,
    #[serde(default)]
    pub skills: Vec<String>,
}

pub fn build_linkedin_request(resume_text: &str) -> GenerationRequest {
    let prompt = fill_template(
        LINKEDIN_PROMPT_TEMPLATE,
        &[
            ("resume_text", truncate_chars(resume_text, MAX_RESUME_CHARS)),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    );
    GenerationRequest::json(prompt, ResponseShape::LinkedInProfile)
}

pub async fn optimize_linkedin(
    llm: &LlmClient,
    resume_text: &str,
) -> Result<LinkedInProfile, LlmError> {
    llm.generate_json(&build_linkedin_request(resume_text)).await
}
