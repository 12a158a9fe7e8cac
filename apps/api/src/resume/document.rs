//! Uploaded résumé documents: type detection, PDF text extraction and the
//! choice between sending text, an inline attachment or a Files API upload.

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::llm_client::{Attachment, GeminiClient, LlmError};
use crate::resume::analysis::ResumeSource;

/// Below this many non-whitespace characters the PDF is treated as scanned.
pub const MIN_EXTRACTED_CHARS: usize = 100;

pub const PDF_MIME: &str = "application/pdf";
const IMAGE_MIMES: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("The uploaded file is empty")]
    Empty,

    #[error("Unsupported file type '{0}'. Upload a PDF, PNG, JPEG or WebP file.")]
    UnsupportedType(String),
}

/// A résumé ready to hand to the analysis task.
#[derive(Debug)]
pub struct PreparedResume {
    /// Text pulled out of the PDF, empty when the document is sent as-is.
    pub extracted_text: String,
    pub source: ResumeSource,
}

/// Sniffs the file signature; falls back to the declared content type.
pub fn detect_mime(data: &[u8], declared: Option<&str>) -> Result<&'static str, DocumentError> {
    if data.is_empty() {
        return Err(DocumentError::Empty);
    }

    let sniffed = if data.starts_with(b"%PDF") {
        Some(PDF_MIME)
    } else if data.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("image/png")
    } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if data.len() >= 12 && &data[..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    };
    if let Some(mime) = sniffed {
        return Ok(mime);
    }

    let declared = declared
        .map(|d| d.split(';').next().unwrap_or(d).trim().to_ascii_lowercase())
        .unwrap_or_default();
    std::iter::once(PDF_MIME)
        .chain(IMAGE_MIMES)
        .find(|known| *known == declared)
        .ok_or(DocumentError::UnsupportedType(declared))
}

fn meaningful_chars(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

/// Extracts the text layer of a PDF. `None` when extraction fails or the
/// document carries too little text to be worth sending as text.
pub async fn extract_pdf_text(data: Bytes) -> Option<String> {
    // pdf-extract is synchronous and can panic on malformed input.
    let extracted =
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data)).await;

    match extracted {
        Ok(Ok(text)) if meaningful_chars(&text) >= MIN_EXTRACTED_CHARS => Some(text),
        Ok(Ok(text)) => {
            debug!(
                "PDF text layer too thin ({} chars), treating as scanned",
                meaningful_chars(&text)
            );
            None
        }
        Ok(Err(e)) => {
            warn!("PDF text extraction failed: {e}");
            None
        }
        Err(e) => {
            warn!("PDF text extraction aborted: {e}");
            None
        }
    }
}

/// Inline up to `inline_max_bytes`, Files API upload above it.
pub async fn prepare_attachment(
    gemini: &GeminiClient,
    data: Bytes,
    mime_type: &str,
    inline_max_bytes: usize,
) -> Result<Attachment, LlmError> {
    if data.len() <= inline_max_bytes {
        return Ok(Attachment::Inline {
            data,
            mime_type: mime_type.to_string(),
        });
    }
    gemini.upload_file(data, mime_type, "Resume File").await
}

/// Text for readable PDFs; otherwise the document itself.
pub async fn prepare_resume(
    gemini: &GeminiClient,
    data: Bytes,
    mime_type: &str,
    inline_max_bytes: usize,
) -> Result<PreparedResume, LlmError> {
    if mime_type == PDF_MIME {
        if let Some(text) = extract_pdf_text(data.clone()).await {
            info!("Extracted {} chars from PDF", text.len());
            return Ok(PreparedResume {
                source: ResumeSource::Text(text.clone()),
                extracted_text: text,
            });
        }
    }

    let attachment = prepare_attachment(gemini, data, mime_type, inline_max_bytes).await?;
    Ok(PreparedResume {
        extracted_text: String::new(),
        source: ResumeSource::Document(attachment),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_detect_mime_by_signature() {
        let cases: [(&[u8], Option<&str>, &str); 5] = [
            (b"%PDF-1.7 ...", None, "application/pdf"),
            (b"\x89PNG\r\n\x1a\n....", Some("application/octet-stream"), "image/png"),
            (&[0xFF, 0xD8, 0xFF, 0xE0, 0x00], None, "image/jpeg"),
            (b"RIFF\x00\x00\x00\x00WEBPVP8 ", None, "image/webp"),
            (b"not a signature", Some("image/JPEG; q=1"), "image/jpeg"),
        ];
        for (data, declared, expected) in cases {
            assert_eq!(detect_mime(data, declared).unwrap(), expected);
        }
    }

    #[test]
    fn test_detect_mime_rejects_unknown_and_empty() {
        assert!(matches!(
            detect_mime(b"PK\x03\x04 docx", Some("application/msword")),
            Err(DocumentError::UnsupportedType(t)) if t == "application/msword"
        ));
        assert!(matches!(detect_mime(b"", Some(PDF_MIME)), Err(DocumentError::Empty)));
    }

    #[tokio::test]
    async fn test_garbage_pdf_yields_no_text() {
        let text = extract_pdf_text(Bytes::from_static(b"%PDF-1.4 truncated")).await;
        assert!(text.is_none());
    }

    #[tokio::test]
    async fn test_small_attachment_is_inline() {
        // unroutable base: inline must not touch the network
        let gemini = GeminiClient::new(Some("k".to_string()), "http://127.0.0.1:9").unwrap();

        let attachment = prepare_attachment(&gemini, Bytes::from_static(b"\x89PNG"), "image/png", 16)
            .await
            .unwrap();

        assert!(matches!(attachment, Attachment::Inline { ref data, .. } if data.len() == 4));
    }

    #[tokio::test]
    async fn test_large_attachment_is_uploaded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload/v1beta/files"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("x-goog-upload-url", format!("{}/upload-session/9", server.uri())),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/upload-session/9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "file": { "uri": "https://files.example/abc", "mimeType": "image/png" }
            })))
            .expect(1)
            .mount(&server)
            .await;
        let gemini = GeminiClient::new(Some("k".to_string()), server.uri()).unwrap();

        let attachment =
            prepare_attachment(&gemini, Bytes::from(vec![0u8; 64]), "image/png", 16)
                .await
                .unwrap();

        assert!(matches!(attachment, Attachment::Remote { ref uri, .. } if uri == "https://files.example/abc"));
    }

    #[tokio::test]
    async fn test_unreadable_pdf_falls_back_to_document() {
        let gemini = GeminiClient::new(Some("k".to_string()), "http://127.0.0.1:9").unwrap();

        let prepared = prepare_resume(
            &gemini,
            Bytes::from_static(b"%PDF-1.4 scanned"),
            PDF_MIME,
            1024,
        )
        .await
        .unwrap();

        assert!(prepared.extracted_text.is_empty());
        assert!(matches!(prepared.source, ResumeSource::Document(Attachment::Inline { .. })));
    }
}
