//! Résumé scoring, from extracted text or from the document itself.

use serde::{Deserialize, Serialize};

use crate::llm_client::prompts::{fill_template, JSON_ONLY_INSTRUCTION};
use crate::llm_client::request::truncate_chars;
use crate::llm_client::{Attachment, GenerationRequest, LlmClient, LlmError, ResponseShape};
use crate::resume::prompts::{ANALYZE_DOCUMENT_PROMPT_TEMPLATE, ANALYZE_TEXT_PROMPT_TEMPLATE};

pub const MAX_RESUME_CHARS: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysis {
    /// 0 – 100
    pub score: f64,
    #[serde(default)]
    pub candidate_name: String,
    pub summary: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
}

/// What the model gets to read.
#[derive(Debug)]
pub enum ResumeSource {
    Text(String),
    Document(Attachment),
}

pub fn build_text_analysis_request(resume_text: &str) -> GenerationRequest {
    let prompt = fill_template(
        ANALYZE_TEXT_PROMPT_TEMPLATE,
        &[
            ("resume_text", truncate_chars(resume_text, MAX_RESUME_CHARS)),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    );
    GenerationRequest::json(prompt, ResponseShape::ResumeAnalysis)
}

pub fn build_document_analysis_request(document: Attachment) -> GenerationRequest {
    let prompt = fill_template(
        ANALYZE_DOCUMENT_PROMPT_TEMPLATE,
        &[("json_only", JSON_ONLY_INSTRUCTION)],
    );
    GenerationRequest::json(prompt, ResponseShape::ResumeAnalysis).with_attachment(document)
}

pub async fn analyze_resume(
    llm: &LlmClient,
    source: ResumeSource,
) -> Result<ResumeAnalysis, LlmError> {
    let request = match source {
        ResumeSource::Text(text) => build_text_analysis_request(&text),
        ResumeSource::Document(document) => build_document_analysis_request(document),
    };
    llm.generate_json(&request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::test_support::{client_for, mount_text_reply};
    use bytes::Bytes;
    use wiremock::MockServer;

    #[test]
    fn test_text_request_truncates_and_has_no_attachment() {
        let resume = "é".repeat(MAX_RESUME_CHARS + 10);
        let request = build_text_analysis_request(&resume);

        assert!(request.attachment().is_none());
        assert!(request.prompt().contains(&"é".repeat(MAX_RESUME_CHARS)));
        assert!(!request.prompt().contains(&"é".repeat(MAX_RESUME_CHARS + 1)));
    }

    #[test]
    fn test_document_request_carries_attachment() {
        let request = build_document_analysis_request(Attachment::Inline {
            data: Bytes::from_static(b"%PDF-1.4"),
            mime_type: "application/pdf".to_string(),
        });

        assert_eq!(
            request.attachment().map(|a| a.mime_type()),
            Some("application/pdf")
        );
        assert!(!request.prompt().contains("{json_only}"));
    }

    #[tokio::test]
    async fn test_analyze_resume_parses_scores() {
        let server = MockServer::start().await;
        mount_text_reply(
            &server,
            r#"{"score": 72, "candidateName": "Ada Lovelace", "summary": "Analyst. Writes programs.", "strengths": ["math"], "improvements": ["add metrics"]}"#,
        )
        .await;
        let llm = client_for(&server.uri());

        let analysis = analyze_resume(&llm, ResumeSource::Text("Ada Lovelace".to_string()))
            .await
            .unwrap();

        assert_eq!(analysis.score, 72.0);
        assert_eq!(analysis.candidate_name, "Ada Lovelace");
        assert_eq!(analysis.improvements, vec!["add metrics"]);
    }
}
