use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use super::{AiError, GenerationConfig, TextGenerator};

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SamplingConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: SamplingConfig,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Text parts of the first candidate, concatenated.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

/// Gemini `generateContent` over REST.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

    pub fn new(api_key: &str, base_url: &str, model: &str) -> Result<Self, AiError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(AiError::MissingApiKey);
        }

        let http = Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .user_agent(concat!("dayone/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AiError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<String, AiError> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part { text: prompt.to_string() }],
            }],
            system_instruction: config.system_instruction.as_ref().map(|text| Content {
                role: None,
                parts: vec![Part { text: text.clone() }],
            }),
            generation_config: SamplingConfig {
                temperature: config.temperature,
                top_p: config.top_p,
            },
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        tracing::debug!("Calling {} (prompt length {})", url, prompt.len());

        let res = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(AiError::Http { status: status.as_u16(), body });
        }

        let response: GenerateResponse = res
            .json()
            .await
            .map_err(|e| AiError::Serde(e.to_string()))?;

        let text = response.text().ok_or(AiError::EmptyResponse)?;
        tracing::info!("Generated {} characters", text.len());
        Ok(text)
    }
}

fn map_reqwest_error(e: reqwest::Error) -> AiError {
    if e.is_timeout() {
        AiError::Timeout
    } else {
        AiError::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_generate_sends_config_and_joins_parts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-test:generateContent"))
            .and(header("x-goog-api-key", "key-123"))
            .and(body_partial_json(json!({
                "contents": [{"role": "user", "parts": [{"text": "hello"}]}],
                "systemInstruction": {"parts": [{"text": "be brief"}]},
                "generationConfig": {"temperature": 0.5}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "Hi "}, {"text": "there"}]}}]
            })))
            .mount(&server)
            .await;

        let client = GeminiClient::new(" key-123 ", &server.uri(), "gemini-test").unwrap();
        let config = GenerationConfig {
            temperature: Some(0.5),
            top_p: None,
            system_instruction: Some("be brief".into()),
        };

        assert_eq!(client.generate("hello", &config).await.unwrap(), "Hi there");
    }

    #[tokio::test]
    async fn test_http_error_and_empty_candidates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/bad:generateContent"))
            .respond_with(ResponseTemplate::new(403).set_body_string("denied"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/models/empty:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .mount(&server)
            .await;

        let bad = GeminiClient::new("k", &server.uri(), "bad").unwrap();
        match bad.generate("x", &GenerationConfig::default()).await.unwrap_err() {
            AiError::Http { status, body } => {
                assert_eq!(status, 403);
                assert_eq!(body, "denied");
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let empty = GeminiClient::new("k", &server.uri(), "empty").unwrap();
        assert!(matches!(
            empty.generate("x", &GenerationConfig::default()).await,
            Err(AiError::EmptyResponse)
        ));
    }

    #[test]
    fn test_blank_key_is_rejected() {
        assert!(matches!(
            GeminiClient::new("  ", "http://localhost", "m"),
            Err(AiError::MissingApiKey)
        ));
    }
}
