use std::time::Duration;

use crate::pipeline::generation::RetryPolicy;

/// Application-level constants
pub const APP_NAME: &str = "CareerBoost";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Gemini REST endpoint root.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Flash model: cheaper and less rate-limited than pro.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Per-request HTTP timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Maximum characters of resume / job description embedded in a prompt.
pub const DEFAULT_MAX_INPUT_CHARS: usize = 50_000;

const ENV_API_KEY: &str = "GEMINI_API_KEY";
const ENV_MODEL: &str = "GEMINI_MODEL";
const ENV_BASE_URL: &str = "GEMINI_BASE_URL";
const ENV_MAX_INPUT_CHARS: &str = "CAREERBOOST_MAX_INPUT_CHARS";

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "careerboost_lib=info,reqwest=warn"
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingVar(&'static str),

    #[error("{var} has an invalid value: {value}")]
    InvalidVar { var: &'static str, value: String },
}

/// Everything a `CareerAnalyzer` needs, passed in explicitly at construction.
#[derive(Clone)]
pub struct AnalyzerConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub request_timeout: Duration,
    pub max_input_chars: usize,
    pub retry: RetryPolicy,
}

// Keep the credential out of logs.
impl std::fmt::Debug for AnalyzerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyzerConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .field("max_input_chars", &self.max_input_chars)
            .field("retry", &self.retry)
            .finish()
    }
}

impl AnalyzerConfig {
    /// Config with defaults for everything but the credential.
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
            retry: RetryPolicy::default(),
        }
    }

    /// Load from the process environment, reading a `.env` file first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(ENV_API_KEY)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingVar(ENV_API_KEY))?;

        let mut config = Self::new(&api_key);

        if let Some(model) = lookup(ENV_MODEL).filter(|m| !m.trim().is_empty()) {
            config.model = model.trim().to_string();
        }
        if let Some(url) = lookup(ENV_BASE_URL).filter(|u| !u.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_MAX_INPUT_CHARS) {
            config.max_input_chars = raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::InvalidVar {
                    var: ENV_MAX_INPUT_CHARS,
                    value: raw.clone(),
                })?;
        }

        Ok(config)
    }
}
