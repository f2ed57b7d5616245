//! # LLM client abstraction
//!
//! Defines the [`LlmClient`] answer-generator port and two implementations:
//! [`OllamaLlmClient`] (Ollama `/api/generate`) and [`OpenAILlmClient`] (OpenAI chat completions).
//!
//! A generator takes the fully composed prompt and returns the answer text. There is no retry
//! contract: one failed call is a final failure for that turn, reported as a [`GenerationError`]
//! so the caller can tell transport problems from service refusals.

use async_trait::async_trait;
use thiserror::Error;

mod config;
mod ollama_llm;
mod openai_llm;

pub use config::{EnvLlmConfig, GeneratorProvider};
pub use ollama_llm::{OllamaLlmClient, DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL};
pub use openai_llm::{OpenAILlmClient, DEFAULT_OPENAI_MODEL};

/// Failures from an answer generator.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// The request never produced a response (connection refused, timeout, DNS, ...).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The service answered but refused or failed the request.
    #[error("Service error (status {status:?}): {message}")]
    Service {
        status: Option<u16>,
        message: String,
    },

    /// The service answered with no text.
    #[error("Empty response from generator")]
    EmptyResponse,
}

/// Answer generator port.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Returns the model's answer for `prompt`. The prompt is sent verbatim.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Checks that the backend is reachable and serving. Default: always ready.
    async fn check_ready(&self) -> Result<(), GenerationError> {
        Ok(())
    }
}

/// Masks an API key for safe logging: first 7 chars + "***" + last 4 chars.
/// Keys of length <= 11 are fully masked.
pub fn mask_token(token: &str) -> String {
    let len = token.len();
    if len <= 11 || !token.is_ascii() {
        "***".to_string()
    } else {
        format!("{}***{}", &token[..7], &token[len - 4..])
    }
}
