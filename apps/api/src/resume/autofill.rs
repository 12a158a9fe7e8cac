//! Free text → structured résumé for the builder form.
//!
//! The model does not produce ids; list items get sequential ids here so the
//! client can key its editable rows.

use serde::{Deserialize, Serialize};

use crate::llm_client::prompts::{fill_template, JSON_ONLY_INSTRUCTION};
use crate::llm_client::request::truncate_chars;
use crate::llm_client::{GenerationRequest, LlmClient, LlmError, ResponseShape};
use crate::resume::prompts::AUTOFILL_PROMPT_TEMPLATE;

pub const MAX_RAW_TEXT_CHARS: usize = 8_000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub github: String,
    pub website: String,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceItem {
    pub id: String,
    pub role: String,
    pub company: String,
    pub date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationItem {
    pub id: String,
    pub degree: String,
    pub school: String,
    pub date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectItem {
    pub id: String,
    pub title: String,
    pub link: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuredResume {
    pub personal: PersonalInfo,
    pub experience: Vec<ExperienceItem>,
    pub education: Vec<EducationItem>,
    pub skills: Vec<String>,
    pub projects: Vec<ProjectItem>,
}

impl StructuredResume {
    /// Overwrites item ids with `exp-1`, `edu-1`, `proj-1`, … and drops blank skills.
    pub fn assign_ids(mut self) -> Self {
        for (i, item) in self.experience.iter_mut().enumerate() {
            item.id = format!("exp-{}", i + 1);
        }
        for (i, item) in self.education.iter_mut().enumerate() {
            item.id = format!("edu-{}", i + 1);
        }
        for (i, item) in self.projects.iter_mut().enumerate() {
            item.id = format!("proj-{}", i + 1);
        }
        self.skills.retain(|s| !s.trim().is_empty());
        self
    }
}

pub fn build_autofill_request(raw_text: &str) -> GenerationRequest {
    let prompt = fill_template(
        AUTOFILL_PROMPT_TEMPLATE,
        &[
            ("raw_text", truncate_chars(raw_text, MAX_RAW_TEXT_CHARS)),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    );
    GenerationRequest::json(prompt, ResponseShape::StructuredResume)
}

pub async fn autofill_resume(
    llm: &LlmClient,
    raw_text: &str,
) -> Result<StructuredResume, LlmError> {
    let parsed: StructuredResume = llm.generate_json(&build_autofill_request(raw_text)).await?;
    Ok(parsed.assign_ids())
}
