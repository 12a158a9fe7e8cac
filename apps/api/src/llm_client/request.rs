//! Generation requests: the parameter objects handed to the orchestrator.

use bytes::Bytes;

/// The JSON shape a caller will validate after extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    ResumeAnalysis,
    JobMatch,
    LinkedInProfile,
    InterviewQuestions,
    AnswerEvaluation,
    StructuredResume,
}

impl ResponseShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseShape::ResumeAnalysis => "resume_analysis",
            ResponseShape::JobMatch => "job_match",
            ResponseShape::LinkedInProfile => "linkedin_profile",
            ResponseShape::InterviewQuestions => "interview_questions",
            ResponseShape::AnswerEvaluation => "answer_evaluation",
            ResponseShape::StructuredResume => "structured_resume",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedOutput {
    RawText,
    Json(ResponseShape),
}

/// A binary document sent alongside the prompt (scanned résumés, images).
#[derive(Clone)]
pub enum Attachment {
    /// Sent base64-encoded in the request body.
    Inline { data: Bytes, mime_type: String },
    /// Uploaded beforehand through the Files API and referenced by URI.
    Remote { uri: String, mime_type: String },
}

impl Attachment {
    pub fn mime_type(&self) -> &str {
        match self {
            Attachment::Inline { mime_type, .. } | Attachment::Remote { mime_type, .. } => {
                mime_type
            }
        }
    }
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Attachment::Inline { data, mime_type } => f
                .debug_struct("Inline")
                .field("bytes", &data.len())
                .field("mime_type", mime_type)
                .finish(),
            Attachment::Remote { uri, mime_type } => f
                .debug_struct("Remote")
                .field("uri", uri)
                .field("mime_type", mime_type)
                .finish(),
        }
    }
}

/// Immutable once built. Owned by the caller until handed to the orchestrator.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    prompt: String,
    attachment: Option<Attachment>,
    expects: ExpectedOutput,
}

impl GenerationRequest {
    pub fn json(prompt: impl Into<String>, shape: ResponseShape) -> Self {
        Self {
            prompt: prompt.into(),
            attachment: None,
            expects: ExpectedOutput::Json(shape),
        }
    }

    pub fn raw_text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            attachment: None,
            expects: ExpectedOutput::RawText,
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    pub fn expects(&self) -> ExpectedOutput {
        self.expects
    }
}

/// Cuts `text` to at most `max_chars` characters, never splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
