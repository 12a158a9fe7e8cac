//! Axum route handlers for the Job API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::job::cover_letter::write_cover_letter;
use crate::job::linkedin::{optimize_linkedin, LinkedInProfile};
use crate::job::matching::{match_job, JobMatch};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAndJobRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedInRequest {
    #[serde(default)]
    pub resume_text: String,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub message: &'static str,
    pub analysis: JobMatch,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterResponse {
    pub cover_letter: String,
}

fn require_resume_and_job(request: &ResumeAndJobRequest) -> Result<(), AppError> {
    if request.resume_text.trim().is_empty() || request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "Resume text and Job Description are required".to_string(),
        ));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/job/match
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<ResumeAndJobRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    require_resume_and_job(&request)?;

    let analysis = match_job(&state.llm, &request.resume_text, &request.job_description).await?;

    Ok(Json(MatchResponse {
        message: "Job analysis complete",
        analysis,
    }))
}

/// POST /api/v1/job/cover-letter
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    Json(request): Json<ResumeAndJobRequest>,
) -> Result<Json<CoverLetterResponse>, AppError> {
    require_resume_and_job(&request)?;

    let cover_letter =
        write_cover_letter(&state.llm, &request.resume_text, &request.job_description).await?;

    Ok(Json(CoverLetterResponse { cover_letter }))
}

/// POST /api/v1/job/linkedin
pub async fn handle_linkedin(
    State(state): State<AppState>,
    Json(request): Json<LinkedInRequest>,
) -> Result<Json<LinkedInProfile>, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation("Resume text is required".to_string()));
    }

    let profile = optimize_linkedin(&state.llm, &request.resume_text).await?;
    Ok(Json(profile))
}
