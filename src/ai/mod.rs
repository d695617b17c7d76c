//! External text-generation collaborator.

mod gemini;
mod prompts;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::GeminiClient;
pub use prompts::{study_strategy_prompt, task_breakdown_prompt, StudyRequest, STUDY_SYSTEM_INSTRUCTION};

/// Shown in place of generated text whenever the collaborator fails.
pub const OFFLINE_MESSAGE: &str =
    "AI service currently unavailable. Please check the API key and try again.";

#[derive(Debug, Clone, Error)]
pub enum AiError {
    #[error("GEMINI_API_KEY not configured or empty")]
    MissingApiKey,
    #[error("network error: {0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("empty response from model")]
    EmptyResponse,
    #[error("json error: {0}")]
    Serde(String),
    #[error("{0}")]
    InvalidPrompt(String),
}

impl AiError {
    /// Short name returned to proxy callers as `errorType`.
    pub fn kind(&self) -> &'static str {
        match self {
            AiError::MissingApiKey => "MissingApiKey",
            AiError::Transport(_) => "Transport",
            AiError::Timeout => "Timeout",
            AiError::Http { .. } => "Http",
            AiError::EmptyResponse => "EmptyResponse",
            AiError::Serde(_) => "Serde",
            AiError::InvalidPrompt(_) => "InvalidPrompt",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationConfig {
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub system_instruction: Option<String>,
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<String, AiError>;
}

/// Never fails: collaborator errors become [`OFFLINE_MESSAGE`].
pub async fn generate_or_offline(
    generator: &dyn TextGenerator,
    prompt: &str,
    config: &GenerationConfig,
) -> String {
    match generator.generate(prompt, config).await {
        Ok(text) => text,
        Err(e) => {
            tracing::error!("AI generation failed: {}", e);
            OFFLINE_MESSAGE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    #[async_trait]
    impl TextGenerator for Failing {
        async fn generate(&self, _: &str, _: &GenerationConfig) -> Result<String, AiError> {
            Err(AiError::Timeout)
        }
    }

    struct Echo;

    #[async_trait]
    impl TextGenerator for Echo {
        async fn generate(&self, prompt: &str, _: &GenerationConfig) -> Result<String, AiError> {
            Ok(prompt.to_uppercase())
        }
    }

    #[tokio::test]
    async fn test_failure_becomes_offline_message() {
        let text = generate_or_offline(&Failing, "hi", &GenerationConfig::default()).await;
        assert_eq!(text, OFFLINE_MESSAGE);

        let text = generate_or_offline(&Echo, "hi", &GenerationConfig::default()).await;
        assert_eq!(text, "HI");
    }
}
