//! Generator configuration loaded from environment variables.

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

use crate::ollama_llm::{DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL};
use crate::openai_llm::DEFAULT_OPENAI_MODEL;

/// Which backend generates answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorProvider {
    Ollama,
    OpenAI,
}

impl FromStr for GeneratorProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAI),
            other => anyhow::bail!("Unknown GENERATOR_PROVIDER: {} (expected ollama or openai)", other),
        }
    }
}

/// Generator config loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvLlmConfig {
    pub provider: GeneratorProvider,
    pub ollama_url: String,
    pub ollama_model: String,
    pub openai_api_key: String,
    pub openai_base_url: Option<String>,
    pub openai_model: String,
}

impl EnvLlmConfig {
    /// Load from environment variables.
    ///
    /// GENERATOR_PROVIDER (ollama | openai, default ollama), OLLAMA_URL, OLLAMA_MODEL,
    /// OPENAI_API_KEY (required for openai), OPENAI_BASE_URL, MODEL.
    pub fn from_env() -> Result<Self> {
        let provider = match env::var("GENERATOR_PROVIDER") {
            Ok(s) if !s.trim().is_empty() => s.parse()?,
            _ => GeneratorProvider::Ollama,
        };
        let ollama_url = env::var("OLLAMA_URL").unwrap_or_else(|_| DEFAULT_OLLAMA_URL.to_string());
        let ollama_model =
            env::var("OLLAMA_MODEL").unwrap_or_else(|_| DEFAULT_OLLAMA_MODEL.to_string());
        let openai_api_key = match provider {
            GeneratorProvider::OpenAI => env::var("OPENAI_API_KEY")
                .context("OPENAI_API_KEY not set (required when GENERATOR_PROVIDER=openai)")?,
            GeneratorProvider::Ollama => env::var("OPENAI_API_KEY").unwrap_or_default(),
        };
        let openai_base_url = env::var("OPENAI_BASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());
        let openai_model = env::var("MODEL").unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.to_string());
        Ok(Self {
            provider,
            ollama_url,
            ollama_model,
            openai_api_key,
            openai_base_url,
            openai_model,
        })
    }
}
