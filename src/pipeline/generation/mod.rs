pub mod types;
pub mod gemini_types;
pub mod gemini;
pub mod resilient;

pub use types::*;
pub use gemini_types::*;
pub use gemini::*;
pub use resilient::*;

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Gemini's API status for quota / rate-limit rejections.
pub const RESOURCE_EXHAUSTED: &str = "RESOURCE_EXHAUSTED";

/// Bare `429` token in an unstructured error message.
static RATE_LIMIT_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b429\b").expect("static regex"));

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("Generation service is not reachable at {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Generation service returned error (status {status}): {message}")]
    Api {
        status: u16,
        /// Structured status from the error body, e.g. `RESOURCE_EXHAUSTED`.
        api_status: Option<String>,
        message: String,
    },

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Prompt was blocked by the service: {0}")]
    Blocked(String),

    #[error("Invalid model name: '{0}'")]
    InvalidModelName(String),
}

impl GenerationError {
    /// Whether this failure is a rate-limit rejection, the only retryable kind.
    ///
    /// Structured signals win: HTTP 429 or an API status of `RESOURCE_EXHAUSTED`.
    /// Unstructured transport errors fall back to spotting `429` in the message.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Self::Api {
                status, api_status, ..
            } => *status == 429 || api_status.as_deref() == Some(RESOURCE_EXHAUSTED),
            Self::HttpClient(message) => RATE_LIMIT_CODE.is_match(message),
            _ => false,
        }
    }
}
