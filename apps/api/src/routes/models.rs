use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelStatus {
    pub active_model: String,
    pub candidate_order: Vec<String>,
    pub max_rate_limit_retries: u32,
    pub configured: bool,
}

#[derive(Debug, Serialize)]
pub struct UpstreamModels {
    pub models: Vec<String>,
}

/// GET /api/v1/ai/models
/// The cached active model and the order the next request would try.
pub async fn handle_model_status(State(state): State<AppState>) -> Json<ModelStatus> {
    let orchestrator = state.llm.orchestrator();
    Json(ModelStatus {
        active_model: orchestrator.selector().active_model(),
        candidate_order: orchestrator.candidate_order(),
        max_rate_limit_retries: orchestrator.policy().max_rate_limit_retries,
        configured: orchestrator.is_configured(),
    })
}

/// GET /api/v1/ai/models/upstream
pub async fn handle_upstream_models(
    State(state): State<AppState>,
) -> Result<Json<UpstreamModels>, AppError> {
    let models = state.gemini.list_models().await?;
    Ok(Json(UpstreamModels { models }))
}
