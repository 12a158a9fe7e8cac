use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::resume::document::DocumentError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

impl From<DocumentError> for AppError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::Empty => AppError::UnprocessableEntity(err.to_string()),
            DocumentError::UnsupportedType(_) => AppError::Validation(err.to_string()),
        }
    }
}

fn llm_status(err: &LlmError) -> (StatusCode, &'static str, String) {
    match err {
        LlmError::MissingApiKey | LlmError::InvalidCredentials { .. } | LlmError::NoCandidates => {
            tracing::error!("AI is not configured: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AI_NOT_CONFIGURED",
                err.to_string(),
            )
        }
        LlmError::AllCandidatesExhausted { .. }
        | LlmError::DeadlineExceeded { .. }
        | LlmError::RateLimited { .. } => {
            tracing::error!("AI unavailable: {err}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "AI_UNAVAILABLE",
                "The AI service is busy or unavailable. Please try again shortly.".to_string(),
            )
        }
        LlmError::MalformedModelOutput { reason, raw } => {
            tracing::error!("Malformed model output ({reason}): {raw}");
            (
                StatusCode::BAD_GATEWAY,
                "AI_MALFORMED_OUTPUT",
                "The AI returned a response that could not be read. Please try again.".to_string(),
            )
        }
        LlmError::Upstream { .. } => {
            tracing::error!("Upstream error: {err}");
            (
                StatusCode::BAD_GATEWAY,
                "AI_UPSTREAM_ERROR",
                err.to_string(),
            )
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Llm(e) => llm_status(e),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::{FailureKind, UpstreamFailure};

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_missing_key_is_a_configuration_error_with_hint() {
        let (status, body) = render(LlmError::MissingApiKey.into()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "AI_NOT_CONFIGURED");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("GEMINI_API_KEY"));
    }

    #[tokio::test]
    async fn test_exhaustion_maps_to_503() {
        let err = LlmError::AllCandidatesExhausted {
            tried: 6,
            last: UpstreamFailure::new("gemini-pro", FailureKind::RateLimited, "429"),
        };
        let (status, body) = render(err.into()).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "AI_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_rate_limited_upload_maps_to_503() {
        let err = LlmError::RateLimited {
            operation: "file upload",
            message: "429 Too Many Requests: RESOURCE_EXHAUSTED".to_string(),
        };
        let (status, body) = render(err.into()).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "AI_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_upstream_failure_maps_to_502() {
        let err = LlmError::Upstream {
            operation: "model listing",
            message: "500 Internal Server Error".to_string(),
        };
        let (status, body) = render(err.into()).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "AI_UPSTREAM_ERROR");
    }

    #[tokio::test]
    async fn test_malformed_output_hides_raw_text() {
        let err = LlmError::MalformedModelOutput {
            reason: "no JSON object".to_string(),
            raw: "secret model chatter".to_string(),
        };
        let (status, body) = render(err.into()).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "AI_MALFORMED_OUTPUT");
        assert!(!body.to_string().contains("secret model chatter"));
    }

    #[tokio::test]
    async fn test_document_errors() {
        let (status, _) = render(DocumentError::Empty.into()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, body) =
            render(DocumentError::UnsupportedType("text/plain".to_string()).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_not_found() {
        let (status, body) = render(AppError::NotFound("Application x not found".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["message"], "Application x not found");
    }
}
