//! Gemini adapter over the Generative Language REST API (`v1beta`).
//!
//! The API key travels in the `x-goog-api-key` header so it never shows up in
//! logged URLs.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::llm_client::invoker::{
    classify_failure, FatalCause, GenerationOutcome, ModelInvoker,
};
use crate::llm_client::request::{Attachment, GenerationRequest};
use crate::llm_client::LlmError;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
const API_VERSION: &str = "v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";
const TEMPERATURE: f32 = 0.4;
const MAX_OUTPUT_TOKENS: u32 = 8192;

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum Part<'a> {
    Text(&'a str),
    InlineData(InlineData<'a>),
    FileData(FileData<'a>),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileData<'a> {
    mime_type: &'a str,
    file_uri: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

impl<'a> GenerateContentRequest<'a> {
    fn from_request(request: &'a GenerationRequest) -> Self {
        let mut parts = vec![Part::Text(request.prompt())];
        match request.attachment() {
            Some(Attachment::Inline { data, mime_type }) => {
                parts.push(Part::InlineData(InlineData {
                    mime_type,
                    data: STANDARD.encode(data),
                }))
            }
            Some(Attachment::Remote { uri, mime_type }) => parts.push(Part::FileData(FileData {
                mime_type,
                file_uri: uri,
            })),
            None => {}
        }

        Self {
            contents: vec![Content {
                role: "user",
                parts,
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Deserialize)]
struct ResponseCandidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate; empty when there is none.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: UploadedFile,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadedFile {
    uri: String,
    #[serde(default)]
    mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelInfo {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

/// Turns an error body into "STATUS: message", falling back to the raw body.
fn describe_error(body: &str) -> String {
    match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) => match envelope.error.status {
            Some(status) => format!("{status}: {}", envelope.error.message),
            None => envelope.error.message,
        },
        Err(_) => body.to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn api_key(&self) -> Result<&str, LlmError> {
        self.api_key.as_deref().ok_or(LlmError::MissingApiKey)
    }

    /// Uploads a document through the Files API (resumable protocol) and
    /// returns a remote attachment referencing it.
    pub async fn upload_file(
        &self,
        data: Bytes,
        mime_type: &str,
        display_name: &str,
    ) -> Result<Attachment, LlmError> {
        const OPERATION: &str = "file upload";
        let api_key = self.api_key()?;

        info!(
            "Uploading {} bytes ({mime_type}) to the Files API",
            data.len()
        );

        let start = self
            .client
            .post(format!("{}/upload/{API_VERSION}/files", self.base_url))
            .header(API_KEY_HEADER, api_key)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", data.len().to_string())
            .header("X-Goog-Upload-Header-Content-Type", mime_type)
            .json(&json!({ "file": { "display_name": display_name } }))
            .send()
            .await
            .map_err(|e| transport_error(OPERATION, e))?;
        let start = ensure_success(OPERATION, start).await?;

        let upload_url = start
            .headers()
            .get("x-goog-upload-url")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| LlmError::Upstream {
                operation: OPERATION,
                message: "response did not include an upload URL".to_string(),
            })?;

        let finished = self
            .client
            .post(&upload_url)
            .header(API_KEY_HEADER, api_key)
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .body(data)
            .send()
            .await
            .map_err(|e| transport_error(OPERATION, e))?;
        let finished = ensure_success(OPERATION, finished).await?;

        let uploaded: UploadResponse =
            finished.json().await.map_err(|e| LlmError::Upstream {
                operation: OPERATION,
                message: format!("could not decode upload response: {e}"),
            })?;

        info!("File uploaded: {}", uploaded.file.uri);

        Ok(Attachment::Remote {
            uri: uploaded.file.uri,
            mime_type: uploaded
                .file
                .mime_type
                .unwrap_or_else(|| mime_type.to_string()),
        })
    }

    /// Names of the models this key can call `generateContent` on, without
    /// the `models/` prefix.
    pub async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        const OPERATION: &str = "model listing";
        let api_key = self.api_key()?;

        let response = self
            .client
            .get(format!("{}/{API_VERSION}/models", self.base_url))
            .header(API_KEY_HEADER, api_key)
            .query(&[("pageSize", "1000")])
            .send()
            .await
            .map_err(|e| transport_error(OPERATION, e))?;
        let response = ensure_success(OPERATION, response).await?;

        let listing: ListModelsResponse =
            response.json().await.map_err(|e| LlmError::Upstream {
                operation: OPERATION,
                message: format!("could not decode model list: {e}"),
            })?;

        Ok(listing
            .models
            .into_iter()
            .filter(|m| {
                m.supported_generation_methods.is_empty()
                    || m.supported_generation_methods
                        .iter()
                        .any(|method| method == "generateContent")
            })
            .map(|m| {
                m.name
                    .strip_prefix("models/")
                    .map(str::to_string)
                    .unwrap_or(m.name)
            })
            .collect())
    }
}

fn transport_error(operation: &'static str, e: reqwest::Error) -> LlmError {
    LlmError::Upstream {
        operation,
        message: e.to_string(),
    }
}

/// Passes 2xx responses through; maps everything else to an `LlmError`,
/// keeping rejected keys and rate limits distinguishable from other failures.
async fn ensure_success(operation: &'static str, response: Response) -> Result<Response, LlmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = describe_error(&body);
    match classify_failure(Some(status.as_u16()), &message) {
        GenerationOutcome::Fatal(FatalCause::InvalidCredentials(message)) => {
            Err(LlmError::InvalidCredentials {
                model: operation.to_string(),
                message,
            })
        }
        GenerationOutcome::RateLimited(message) => Err(LlmError::RateLimited { operation, message }),
        _ => Err(LlmError::Upstream {
            operation,
            message: format!("{status}: {message}"),
        }),
    }
}

#[async_trait]
impl ModelInvoker for GeminiClient {
    fn ensure_configured(&self) -> Result<(), LlmError> {
        self.api_key().map(|_| ())
    }

    async fn invoke(&self, model: &str, request: &GenerationRequest) -> GenerationOutcome {
        let api_key = match self.api_key() {
            Ok(key) => key,
            Err(e) => return GenerationOutcome::Fatal(FatalCause::InvalidCredentials(e.to_string())),
        };

        let url = format!(
            "{}/{API_VERSION}/models/{model}:generateContent",
            self.base_url
        );
        let body = GenerateContentRequest::from_request(request);

        let response = match self
            .client
            .post(&url)
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                return GenerationOutcome::Fatal(FatalCause::Upstream(format!(
                    "HTTP error: {e}"
                )))
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = describe_error(&body);
            debug!("Gemini {model} returned {status}: {message}");
            return classify_failure(Some(status.as_u16()), &format!("{status}: {message}"));
        }

        match response.json::<GenerateContentResponse>().await {
            Ok(parsed) => GenerationOutcome::Success(parsed.text()),
            Err(e) => GenerationOutcome::Fatal(FatalCause::Upstream(format!(
                "could not decode generateContent response: {e}"
            ))),
        }
    }
}
