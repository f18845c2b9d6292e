//! Natural-language math solving through a hosted language model.

use std::future::Future;

use llm::LLMProvider;
use llm::builder::{LLMBackend, LLMBuilder};
use llm::chat::ChatMessage;
use thiserror::Error;
use tracing::{info, warn};

use super::prompt::SYSTEM_PROMPT;
use crate::config::AiConfig;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum AiError {
    #[error("AI solver is disabled in the configuration")]
    Disabled,

    #[error("API key is missing, set ${0}")]
    MissingApiKey(String),

    #[error("question is empty")]
    EmptyPrompt,

    #[error("failed to set up AI client: {0}")]
    Build(String),

    #[error("could not reach the AI service: {0}")]
    Request(String),

    #[error("the AI service returned no answer")]
    EmptyResponse,
}

/// Something that can answer a free-text math question.
///
/// A successful answer goes onto the display verbatim; an error is shown to
/// the user and leaves the calculator untouched.
pub trait Solver {
    fn solve(&self, prompt: &str) -> impl Future<Output = Result<String, AiError>>;
}

/// Solver backed by Google Gemini.
pub struct GeminiSolver {
    provider: Box<dyn LLMProvider>,
    model: String,
}

impl GeminiSolver {
    /// Build a solver from the `[ai]` configuration section.
    ///
    /// The API key is read from the environment variable named by
    /// `api_key_env`.
    pub fn from_config(config: &AiConfig) -> Result<Self, AiError> {
        if !config.enabled {
            return Err(AiError::Disabled);
        }

        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AiError::MissingApiKey(config.api_key_env.clone()))?;

        let provider = LLMBuilder::new()
            .backend(LLMBackend::Google)
            .api_key(api_key)
            .model(&config.model)
            .temperature(config.temperature)
            .timeout_seconds(config.timeout_seconds)
            .system(SYSTEM_PROMPT)
            .build()
            .map_err(|e| AiError::Build(e.to_string()))?;

        Ok(Self {
            provider,
            model: config.model.clone(),
        })
    }
}

impl Solver for GeminiSolver {
    async fn solve(&self, prompt: &str) -> Result<String, AiError> {
        let question = prompt.trim();
        if question.is_empty() {
            return Err(AiError::EmptyPrompt);
        }

        info!(model = %self.model, "asking AI solver");
        let messages = vec![ChatMessage::user().content(question).build()];

        let response = self.provider.chat(&messages).await.map_err(|e| {
            warn!(error = %e, "AI request failed");
            AiError::Request(e.to_string())
        })?;

        response
            .text()
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(AiError::EmptyResponse)
    }
}
