pub mod health;
pub mod models;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::interview::handlers as interview;
use crate::job::handlers as job;
use crate::resume::handlers as resume;
use crate::state::AppState;
use crate::tracker::handlers as tracker;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // AI diagnostics
        .route("/api/v1/ai/models", get(models::handle_model_status))
        .route(
            "/api/v1/ai/models/upstream",
            get(models::handle_upstream_models),
        )
        // Resume API
        .route("/api/v1/resume/analyze", post(resume::handle_analyze))
        .route("/api/v1/resume/autofill", post(resume::handle_autofill))
        // Job API
        .route("/api/v1/job/match", post(job::handle_match))
        .route("/api/v1/job/cover-letter", post(job::handle_cover_letter))
        .route("/api/v1/job/linkedin", post(job::handle_linkedin))
        // Interview API
        .route(
            "/api/v1/interview/generate",
            post(interview::handle_generate_questions),
        )
        .route(
            "/api/v1/interview/evaluate",
            post(interview::handle_evaluate_answer),
        )
        // Tracker API
        .route(
            "/api/v1/applications",
            get(tracker::handle_list).post(tracker::handle_create),
        )
        .route(
            "/api/v1/applications/:id",
            patch(tracker::handle_update_status).delete(tracker::handle_delete),
        )
        .layer(body_limit)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;
    use wiremock::MockServer;

    use super::*;
    use crate::config::Config;
    use crate::llm_client::test_support::{mount_text_reply, TEST_MODEL};

    /// Router over a lazy pool (never connected) and the given upstream.
    fn app(api_key: Option<&str>, api_base: &str) -> Router {
        let mut env: HashMap<&str, String> = HashMap::from([
            ("DATABASE_URL", "postgres://localhost/hirewise_test".to_string()),
            ("GEMINI_API_BASE", api_base.to_string()),
            ("GEMINI_MODELS", TEST_MODEL.to_string()),
            ("LLM_DEADLINE_SECS", "0".to_string()),
        ]);
        if let Some(key) = api_key {
            env.insert("GEMINI_API_KEY", key.to_string());
        }
        let config = Config::from_lookup(|key| env.get(key).cloned()).unwrap();
        let db = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();
        build_router(AppState::new(db, config).unwrap())
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart(field: &str, file_name: &str, content_type: &str, data: &[u8]) -> Request<Body> {
        let boundary = "hirewise-test-boundary";
        let mut body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/v1/resume/analyze")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(app(None, "http://127.0.0.1:9"), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "hirewise-api");
    }

    #[tokio::test]
    async fn test_model_status_without_key() {
        let request = Request::builder()
            .uri("/api/v1/ai/models")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(None, "http://127.0.0.1:9"), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["activeModel"], TEST_MODEL);
        assert_eq!(body["candidateOrder"], json!([TEST_MODEL]));
        assert_eq!(body["maxRateLimitRetries"], 2);
        assert_eq!(body["configured"], false);
    }

    #[tokio::test]
    async fn test_match_requires_both_fields() {
        let (status, body) = send(
            app(Some("k"), "http://127.0.0.1:9"),
            post_json("/api/v1/job/match", json!({ "resumeText": "Go dev" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_match_without_key_reports_configuration() {
        let (status, body) = send(
            app(None, "http://127.0.0.1:9"),
            post_json(
                "/api/v1/job/match",
                json!({ "resumeText": "Go dev", "jobDescription": "Go role" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "AI_NOT_CONFIGURED");
    }

    #[tokio::test]
    async fn test_match_end_to_end() {
        let server = MockServer::start().await;
        mount_text_reply(
            &server,
            r#"{"matchPercentage":80,"matchStatus":"High","missingSkills":[],"matchingSkills":["Go","Kubernetes"],"cultureFitScore":8,"advice":"Apply now"}"#,
        )
        .await;

        let (status, body) = send(
            app(Some("k"), &server.uri()),
            post_json(
                "/api/v1/job/match",
                json!({
                    "resumeText": "Experienced backend engineer, Go, Kubernetes",
                    "jobDescription": "Looking for a Go developer with Kubernetes experience"
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Job analysis complete");
        assert_eq!(body["analysis"]["matchPercentage"], 80.0);
        assert_eq!(body["analysis"]["matchingSkills"], json!(["Go", "Kubernetes"]));
    }

    #[tokio::test]
    async fn test_cover_letter_end_to_end() {
        let server = MockServer::start().await;
        mount_text_reply(&server, "Dear Hiring Manager,\nI would love to join.").await;

        let (status, body) = send(
            app(Some("k"), &server.uri()),
            post_json(
                "/api/v1/job/cover-letter",
                json!({ "resumeText": "Go dev", "jobDescription": "Go role" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["coverLetter"], "Dear Hiring Manager,\nI would love to join.");
    }

    #[tokio::test]
    async fn test_interview_generate_requires_job_description() {
        let (status, _) = send(
            app(Some("k"), "http://127.0.0.1:9"),
            post_json("/api/v1/interview/generate", json!({ "resumeText": "Go dev" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_evaluate_wraps_evaluation() {
        let server = MockServer::start().await;
        mount_text_reply(
            &server,
            r#"{"score": 8, "feedback": "Clear.", "improvedAnswer": "Same, with numbers."}"#,
        )
        .await;

        let (status, body) = send(
            app(Some("k"), &server.uri()),
            post_json(
                "/api/v1/interview/evaluate",
                json!({ "question": "Why Go?", "answer": "Simplicity." }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["evaluation"]["improvedAnswer"], "Same, with numbers.");
    }

    #[tokio::test]
    async fn test_analyze_rejects_unsupported_file() {
        let (status, body) = send(
            app(Some("k"), "http://127.0.0.1:9"),
            multipart("resume", "resume.txt", "text/plain", b"plain text resume"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("text/plain"));
    }

    #[tokio::test]
    async fn test_analyze_requires_resume_field() {
        let (status, body) = send(
            app(Some("k"), "http://127.0.0.1:9"),
            multipart("cv", "cv.pdf", "application/pdf", b"%PDF-1.4"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "No file uploaded");
    }

    #[tokio::test]
    async fn test_analyze_image_end_to_end() {
        let server = MockServer::start().await;
        mount_text_reply(
            &server,
            r#"{"score": 64, "candidateName": "Ada", "summary": "Analyst.", "strengths": [], "improvements": ["add dates"]}"#,
        )
        .await;

        let (status, body) = send(
            app(Some("k"), &server.uri()),
            multipart("resume", "scan.png", "image/png", b"\x89PNG\r\n\x1a\nfake-image"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Resume analyzed successfully");
        assert_eq!(body["fileName"], "scan.png");
        assert_eq!(body["extractedText"], "...");
        assert_eq!(body["analysis"]["score"], 64.0);
    }

    #[tokio::test]
    async fn test_application_id_must_be_uuid() {
        let request = Request::builder()
            .method("DELETE")
            .uri("/api/v1/applications/not-a-uuid")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(app(None, "http://127.0.0.1:9"), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_application_validates_before_database() {
        let (status, body) = send(
            app(None, "http://127.0.0.1:9"),
            post_json("/api/v1/applications", json!({ "company": "Acme" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}
