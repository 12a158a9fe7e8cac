//! Axum route handlers for the Interview API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::interview::evaluation::{evaluate_answer, AnswerEvaluation};
use crate::interview::questions::{generate_questions, InterviewQuestions};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuestionsRequest {
    #[serde(default)]
    pub resume_text: Option<String>,
    #[serde(default)]
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateAnswerRequest {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub job_description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EvaluateAnswerResponse {
    pub evaluation: AnswerEvaluation,
}

/// POST /api/v1/interview/generate
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    Json(request): Json<GenerateQuestionsRequest>,
) -> Result<Json<InterviewQuestions>, AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "Job Description is required".to_string(),
        ));
    }

    let questions = generate_questions(
        &state.llm,
        &request.job_description,
        request.resume_text.as_deref(),
    )
    .await?;
    Ok(Json(questions))
}

/// POST /api/v1/interview/evaluate
pub async fn handle_evaluate_answer(
    State(state): State<AppState>,
    Json(request): Json<EvaluateAnswerRequest>,
) -> Result<Json<EvaluateAnswerResponse>, AppError> {
    if request.question.trim().is_empty() || request.answer.trim().is_empty() {
        return Err(AppError::Validation(
            "Question and answer are required".to_string(),
        ));
    }

    let evaluation = evaluate_answer(
        &state.llm,
        &request.question,
        &request.answer,
        request.job_description.as_deref(),
    )
    .await?;
    Ok(Json(EvaluateAnswerResponse { evaluation }))
}
