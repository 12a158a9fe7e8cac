//! Cover letter, the one free-text task; no JSON extraction.

use crate::job::prompts::COVER_LETTER_PROMPT_TEMPLATE;
use crate::llm_client::prompts::fill_template;
use crate::llm_client::request::truncate_chars;
use crate::llm_client::{GenerationRequest, LlmClient, LlmError};

pub const MAX_FIELD_CHARS: usize = 3_000;

pub fn build_cover_letter_request(resume_text: &str, job_description: &str) -> GenerationRequest {
    let prompt = fill_template(
        COVER_LETTER_PROMPT_TEMPLATE,
        &[
            ("resume_text", truncate_chars(resume_text, MAX_FIELD_CHARS)),
            (
                "job_description",
                truncate_chars(job_description, MAX_FIELD_CHARS),
            ),
        ],
    );
    GenerationRequest::raw_text(prompt)
}

pub async fn write_cover_letter(
    llm: &LlmClient,
    resume_text: &str,
    job_description: &str,
) -> Result<String, LlmError> {
    llm.generate_text(&build_cover_letter_request(resume_text, job_description))
        .await
}
