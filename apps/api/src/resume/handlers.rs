//! Axum route handlers for the Resume API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::request::truncate_chars;
use crate::resume::analysis::{analyze_resume, ResumeAnalysis};
use crate::resume::autofill::{autofill_resume, StructuredResume};
use crate::resume::document::{detect_mime, prepare_resume};
use crate::state::AppState;

const UPLOAD_FIELD: &str = "resume";
const PREVIEW_CHARS: usize = 500;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub message: &'static str,
    pub file_name: String,
    pub extracted_text: String,
    pub analysis: ResumeAnalysis,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutofillRequest {
    #[serde(default)]
    pub raw_text: String,
}

struct UploadedFile {
    file_name: String,
    content_type: Option<String>,
    data: Bytes,
}

async fn read_upload(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("resume").to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read uploaded file: {e}")))?;
        return Ok(UploadedFile {
            file_name,
            content_type,
            data,
        });
    }
    Err(AppError::Validation("No file uploaded".to_string()))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resume/analyze
///
/// Multipart upload (field `resume`). Readable PDFs are scored from their text;
/// scans and images are sent to the model as documents.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let upload = read_upload(multipart).await?;
    let mime_type = detect_mime(&upload.data, upload.content_type.as_deref())?;
    info!(
        "Analyzing resume '{}' ({mime_type}, {} bytes)",
        upload.file_name,
        upload.data.len()
    );

    state.llm.orchestrator().ensure_configured()?;
    let prepared = prepare_resume(
        &state.gemini,
        upload.data,
        mime_type,
        state.config.inline_attachment_max_bytes,
    )
    .await?;
    let preview = format!(
        "{}...",
        truncate_chars(&prepared.extracted_text, PREVIEW_CHARS)
    );

    let analysis = analyze_resume(&state.llm, prepared.source).await?;

    Ok(Json(AnalyzeResponse {
        message: "Resume analyzed successfully",
        file_name: upload.file_name,
        extracted_text: preview,
        analysis,
    }))
}

/// POST /api/v1/resume/autofill
pub async fn handle_autofill(
    State(state): State<AppState>,
    Json(request): Json<AutofillRequest>,
) -> Result<Json<StructuredResume>, AppError> {
    if request.raw_text.trim().is_empty() {
        return Err(AppError::Validation("rawText is required".to_string()));
    }

    let resume = autofill_resume(&state.llm, &request.raw_text).await?;
    Ok(Json(resume))
}
