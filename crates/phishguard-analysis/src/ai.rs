use phishguard_core::{AppError, AppResult};
use serde::Serialize;
use std::time::Duration;

pub trait AiProvider {
    fn generate(&self, prompt: &str) -> AppResult<String>;
}

/// Generative Language REST provider. One prompt in, one text completion out.
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    timeout: Duration,
}

impl GeminiProvider {
    pub fn new(endpoint: String, model: String, api_key: String, timeout: Duration) -> Self {
        Self {
            endpoint,
            model,
            api_key,
            timeout,
        }
    }

    fn endpoint_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

impl AiProvider for GeminiProvider {
    fn generate(&self, prompt: &str) -> AppResult<String> {
        let url = self.endpoint_url();
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };
        let response = ureq::post(&url)
            .timeout(self.timeout)
            .set("x-goog-api-key", &self.api_key)
            .send_json(body)
            .map_err(|e| AppError::internal(format!("ai request failed: {e}")))?;
        let value: serde_json::Value = response
            .into_json()
            .map_err(|e| AppError::internal(format!("ai response read error: {e}")))?;
        let text = value
            .get("candidates")
            .and_then(|v| v.get(0))
            .and_then(|v| v.get("content"))
            .and_then(|v| v.get("parts"))
            .and_then(|v| v.get(0))
            .and_then(|v| v.get("text"))
            .and_then(|v| v.as_str())
            .ok_or_else(|| AppError::validation("ai response missing candidate text"))?;
        Ok(text.to_string())
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockMode {
    Valid,
    Danger,
    Fenced,
    MissingScore,
    Malformed,
    Fail,
}

/// Offline stand-in selected by `mock://` endpoints; used by tests and
/// local development without a credential.
#[derive(Debug, Clone)]
pub struct MockProvider {
    mode: MockMode,
}

impl MockProvider {
    pub fn from_endpoint(endpoint: &str) -> Option<Self> {
        let mode = match endpoint {
            "mock://valid" => MockMode::Valid,
            "mock://danger" => MockMode::Danger,
            "mock://fenced" => MockMode::Fenced,
            "mock://missing_score" => MockMode::MissingScore,
            "mock://malformed" => MockMode::Malformed,
            "mock://fail" => MockMode::Fail,
            _ => return None,
        };
        Some(Self { mode })
    }
}

impl AiProvider for MockProvider {
    fn generate(&self, _prompt: &str) -> AppResult<String> {
        let text = match self.mode {
            MockMode::Valid => {
                r#"{"risk_score": 12, "justification": "No credential harvesting signals found."}"#
            }
            MockMode::Danger => {
                r#"{"risk_score": 88, "justification": "Login form mimics a known brand."}"#
            }
            MockMode::Fenced => {
                "```json\n{\"risk_score\": 88, \"justification\": \"Login form mimics a known brand.\"}\n```"
            }
            MockMode::MissingScore => r#"{"justification": "Score withheld."}"#,
            MockMode::Malformed => "the model rambled instead of returning JSON",
            MockMode::Fail => return Err(AppError::internal("mock ai provider failure")),
        };
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gemini_url_joins_endpoint_and_model() {
        let provider = GeminiProvider::new(
            "https://generativelanguage.googleapis.com/v1beta/".to_string(),
            "gemini-2.0-flash".to_string(),
            "key".to_string(),
            Duration::from_secs(5),
        );
        assert_eq!(
            provider.endpoint_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn mock_endpoints_resolve_modes() {
        assert!(MockProvider::from_endpoint("mock://valid").is_some());
        assert!(MockProvider::from_endpoint("mock://fail").is_some());
        assert!(MockProvider::from_endpoint("http://localhost").is_none());
    }

    #[test]
    fn failing_mock_returns_error() {
        let provider = MockProvider::from_endpoint("mock://fail").unwrap();
        assert!(provider.generate("prompt").is_err());
    }
}
