//! Gemini `generateContent` wire types and model-name validation.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::GenerationError;

// ──────────────────────────────────────────────
// Request
// ──────────────────────────────────────────────

/// Request body for `POST /v1beta/models/{model}:generateContent`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest<'a> {
    pub contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestContent<'a> {
    pub parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestPart<'a> {
    pub text: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    /// Single-turn, text-only request.
    pub fn from_prompt(prompt: &'a str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        }
    }
}

// ──────────────────────────────────────────────
// Response
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate.
    ///
    /// A response without candidates is a blocked prompt when feedback says so,
    /// otherwise a malformed reply.
    pub fn into_text(self) -> Result<String, GenerationError> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            let reason = self
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_default();
            return if reason.is_empty() {
                Err(GenerationError::ResponseParsing("No candidates in response".into()))
            } else {
                Err(GenerationError::Blocked(reason))
            };
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() && candidate.finish_reason.as_deref() == Some("SAFETY") {
            return Err(GenerationError::Blocked("SAFETY".into()));
        }

        Ok(text)
    }
}

/// Error envelope: `{"error": {"code": 429, "message": "...", "status": "RESOURCE_EXHAUSTED"}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
    pub status: Option<String>,
}

/// Build a structured error from a non-success HTTP response body.
/// Bodies that are not the JSON envelope are kept verbatim as the message.
pub fn api_error_from_body(status: u16, body: &str) -> GenerationError {
    match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) => GenerationError::Api {
            status: envelope.error.code.unwrap_or(status),
            api_status: envelope.error.status,
            message: envelope.error.message,
        },
        Err(_) => GenerationError::Api {
            status,
            api_status: None,
            message: body.trim().to_string(),
        },
    }
}

/// Error status whose body could not be read; keeps the read failure as the message.
pub fn api_error_unread_body(status: u16, read_error: &str) -> GenerationError {
    GenerationError::Api {
        status,
        api_status: None,
        message: format!("failed to read error body: {read_error}"),
    }
}

// ──────────────────────────────────────────────
// Validation
// ──────────────────────────────────────────────

static MODEL_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9._-]*$").expect("static regex")
});

/// Validate a model identifier before it is placed in a URL path.
///
/// Valid: `gemini-1.5-flash`, `gemini-2.0-flash-001`.
/// Invalid: `../v1/files`, `gemini flash`, `models/gemini?key=x`.
pub fn validate_model_name(name: &str) -> Result<(), GenerationError> {
    if MODEL_NAME.is_match(name) {
        Ok(())
    } else {
        Err(GenerationError::InvalidModelName(name.to_string()))
    }
}
