use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::gemini_types::{
    api_error_from_body, api_error_unread_body, validate_model_name, GenerateContentRequest,
    GenerateContentResponse,
};
use super::types::LlmClient;
use super::GenerationError;
use crate::config::AnalyzerConfig;

/// Blocking HTTP client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl GeminiClient {
    /// Create a client for one model. The model name is validated because it
    /// becomes part of the request path.
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        validate_model_name(model)?;

        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client,
            timeout_secs: timeout.as_secs(),
        })
    }

    pub fn from_config(config: &AnalyzerConfig) -> Result<Self, GenerationError> {
        Self::new(
            &config.base_url,
            &config.api_key,
            &config.model,
            config.request_timeout,
        )
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

impl LlmClient for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&GenerateContentRequest::from_prompt(prompt))
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    GenerationError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    GenerationError::Timeout(self.timeout_secs)
                } else {
                    GenerationError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(match response.text() {
                Ok(body) => api_error_from_body(status.as_u16(), &body),
                Err(e) => api_error_unread_body(status.as_u16(), &e.to_string()),
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .map_err(|e| GenerationError::ResponseParsing(e.to_string()))?;

        parsed.into_text()
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Mock LLM client for testing: replays a script of outcomes, then a fallback.
pub struct MockLlmClient {
    script: Mutex<VecDeque<Result<String, GenerationError>>>,
    fallback: Result<String, GenerationError>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl MockLlmClient {
    /// Always answers with `response`.
    pub fn new(response: &str) -> Self {
        Self::with_fallback(Ok(response.to_string()))
    }

    /// Always fails with `error`.
    pub fn failing(error: GenerationError) -> Self {
        Self::with_fallback(Err(error))
    }

    fn with_fallback(fallback: Result<String, GenerationError>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Queue outcomes returned, in order, before the fallback applies.
    pub fn with_script(self, outcomes: Vec<Result<String, GenerationError>>) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.extend(outcomes);
        }
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl LlmClient for MockLlmClient {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        let scripted = self.script.lock().ok().and_then(|mut s| s.pop_front());
        scripted.unwrap_or_else(|| self.fallback.clone())
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(server: &mockito::ServerGuard) -> GeminiClient {
        GeminiClient::new(&server.url(), "test-key", "gemini-1.5-flash", Duration::from_secs(5))
            .unwrap()
    }

    const PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

    #[test]
    fn mock_client_returns_configured_response() {
        let client = MockLlmClient::new("test response");
        assert_eq!(client.generate("prompt").unwrap(), "test response");
        assert_eq!(client.call_count(), 1);
        assert_eq!(client.prompts(), vec!["prompt".to_string()]);
    }

    #[test]
    fn mock_client_replays_script_then_fallback() {
        let client = MockLlmClient::new("fallback").with_script(vec![
            Err(GenerationError::Timeout(1)),
            Ok("scripted".into()),
        ]);
        assert_eq!(client.generate("a"), Err(GenerationError::Timeout(1)));
        assert_eq!(client.generate("b").unwrap(), "scripted");
        assert_eq!(client.generate("c").unwrap(), "fallback");
        assert_eq!(client.call_count(), 3);
    }

    #[test]
    fn constructor_trims_trailing_slash() {
        let client = GeminiClient::new(
            "https://generativelanguage.googleapis.com/",
            "k",
            "gemini-1.5-flash",
            Duration::from_secs(60),
        )
        .unwrap();
        assert_eq!(client.base_url, "https://generativelanguage.googleapis.com");
        assert_eq!(client.timeout_secs, 60);
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn constructor_rejects_unsafe_model_name() {
        let result = GeminiClient::new("http://localhost", "k", "../admin", Duration::from_secs(1));
        assert!(matches!(result, Err(GenerationError::InvalidModelName(_))));
    }

    #[test]
    fn model_name_accessor_reports_configured_model() {
        let config = AnalyzerConfig::new("k");
        let client = GeminiClient::from_config(&config).unwrap();
        assert_eq!(client.model_name(), "gemini-1.5-flash");
    }

    #[test]
    fn generate_returns_candidate_text() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", PATH)
            .match_header("x-goog-api-key", "test-key")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "contents": [{"parts": [{"text": "Analyze this resume"}]}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"Resume Score: 78"}]},"finishReason":"STOP"}]}"#)
            .create();

        let text = client_for(&server).generate("Analyze this resume").unwrap();
        assert_eq!(text, "Resume Score: 78");
        mock.assert();
    }

    #[test]
    fn http_429_maps_to_rate_limited_error() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", PATH)
            .with_status(429)
            .with_body(r#"{"error":{"code":429,"message":"Resource has been exhausted","status":"RESOURCE_EXHAUSTED"}}"#)
            .create();

        let err = client_for(&server).generate("p").unwrap_err();
        assert!(err.is_rate_limited());
    }

    #[test]
    fn http_401_is_terminal_api_error() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", PATH)
            .with_status(401)
            .with_body(r#"{"error":{"code":401,"message":"API key not valid","status":"UNAUTHENTICATED"}}"#)
            .create();

        let err = client_for(&server).generate("p").unwrap_err();
        assert!(matches!(err, GenerationError::Api { status: 401, .. }));
        assert!(!err.is_rate_limited());
    }

    #[test]
    fn malformed_success_body_is_parse_error() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", PATH)
            .with_status(200)
            .with_body("<html>not json</html>")
            .create();

        let err = client_for(&server).generate("p").unwrap_err();
        assert!(matches!(err, GenerationError::ResponseParsing(_)));
    }

    #[test]
    fn unreachable_host_is_connection_error() {
        // Port 9 (discard) is closed on test machines.
        let client =
            GeminiClient::new("http://127.0.0.1:9", "k", "gemini-1.5-flash", Duration::from_secs(2))
                .unwrap();
        let err = client.generate("p").unwrap_err();
        assert!(!err.is_rate_limited());
    }
}
