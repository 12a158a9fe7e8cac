//! Axum route handlers for the Tracker API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{JobApplicationRow, NewApplication, StatusUpdate};
use crate::state::AppState;
use crate::tracker::store;

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: &'static str,
}

fn validate_new(new: &NewApplication) -> Result<(), AppError> {
    if new.company.trim().is_empty() || new.role.trim().is_empty() {
        return Err(AppError::Validation(
            "company and role are required".to_string(),
        ));
    }
    if let Some(score) = new.match_score {
        if !(0.0..=100.0).contains(&score) {
            return Err(AppError::Validation(
                "matchScore must be between 0 and 100".to_string(),
            ));
        }
    }
    Ok(())
}

/// GET /api/v1/applications
pub async fn handle_list(
    State(state): State<AppState>,
) -> Result<Json<Vec<JobApplicationRow>>, AppError> {
    Ok(Json(store::list_applications(&state.db).await?))
}

/// POST /api/v1/applications
pub async fn handle_create(
    State(state): State<AppState>,
    Json(new): Json<NewApplication>,
) -> Result<(StatusCode, Json<JobApplicationRow>), AppError> {
    validate_new(&new)?;
    let row = store::create_application(&state.db, &new).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PATCH /api/v1/applications/:id
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<JobApplicationRow>, AppError> {
    let row = store::update_status(&state.db, id, update.status)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))?;
    Ok(Json(row))
}

/// DELETE /api/v1/applications/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, AppError> {
    if !store::delete_application(&state.db, id).await? {
        return Err(AppError::NotFound(format!("Application {id} not found")));
    }
    Ok(Json(DeleteResponse {
        message: "Application deleted",
    }))
}
