//! Interview question generation.

use serde::{Deserialize, Serialize};

use crate::interview::prompts::{QUESTIONS_PROMPT_TEMPLATE, QUESTIONS_RESUME_SECTION};
use crate::llm_client::prompts::{fill_template, JSON_ONLY_INSTRUCTION};
use crate::llm_client::request::truncate_chars;
use crate::llm_client::{GenerationRequest, LlmClient, LlmError, ResponseShape};

pub const MAX_FIELD_CHARS: usize = 5_000;
pub const QUESTION_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewQuestions {
    pub questions: Vec<String>,
}

pub fn build_questions_request(job_description: &str, resume_text: Option<&str>) -> GenerationRequest {
    let resume_section = resume_text
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| {
            fill_template(
                QUESTIONS_RESUME_SECTION,
                &[("resume_text", truncate_chars(text, MAX_FIELD_CHARS))],
            )
        })
        .unwrap_or_default();

    let question_count = QUESTION_COUNT.to_string();
    let prompt = fill_template(
        QUESTIONS_PROMPT_TEMPLATE,
        &[
            ("question_count", question_count.as_str()),
            (
                "job_description",
                truncate_chars(job_description, MAX_FIELD_CHARS),
            ),
            ("resume_section", resume_section.as_str()),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    );
    GenerationRequest::json(prompt, ResponseShape::InterviewQuestions)
}

pub async fn generate_questions(
    llm: &LlmClient,
    job_description: &str,
    resume_text: Option<&str>,
) -> Result<InterviewQuestions, LlmError> {
    let request = build_questions_request(job_description, resume_text);
    let generated: InterviewQuestions = llm.generate_json(&request).await?;

    let questions: Vec<String> = generated
        .questions
        .iter()
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .collect();

    if questions.is_empty() {
        return Err(LlmError::MalformedModelOutput {
            reason: "model returned no interview questions".to_string(),
            raw: serde_json::to_string(&generated).unwrap_or_default(),
        });
    }
    Ok(InterviewQuestions { questions })
}
