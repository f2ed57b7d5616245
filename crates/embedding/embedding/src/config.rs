//! Embedding configuration: trait and env-based implementation.

use anyhow::Result;
use std::env;

/// Model used when `EMBEDDING_MODEL` is not set.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Embedding service configuration interface.
pub trait EmbeddingConfig: Send + Sync {
    fn model(&self) -> &str;
    /// API key for the OpenAI-compatible endpoint (OPENAI_API_KEY).
    fn api_key(&self) -> &str;
    /// Optional base URL (OPENAI_BASE_URL), e.g. a local Ollama `/v1` endpoint.
    fn base_url(&self) -> Option<&str>;
}

/// Embedding config loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvEmbeddingConfig {
    pub embedding_model: String,
    pub openai_api_key: String,
    pub openai_base_url: Option<String>,
}

impl EmbeddingConfig for EnvEmbeddingConfig {
    fn model(&self) -> &str {
        &self.embedding_model
    }
    fn api_key(&self) -> &str {
        &self.openai_api_key
    }
    fn base_url(&self) -> Option<&str> {
        self.openai_base_url.as_deref().filter(|s| !s.is_empty())
    }
}

impl EnvEmbeddingConfig {
    /// Load from environment variables.
    pub fn from_env() -> Result<Self> {
        let embedding_model = env::var("EMBEDDING_MODEL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string());
        let openai_api_key = env::var("OPENAI_API_KEY").unwrap_or_default();
        let openai_base_url = env::var("OPENAI_BASE_URL").ok().filter(|s| !s.trim().is_empty());
        Ok(Self {
            embedding_model,
            openai_api_key,
            openai_base_url,
        })
    }

    /// Validate config: a hosted endpoint needs a key; a custom base URL (local server) may not.
    pub fn validate(&self) -> Result<()> {
        if self.openai_api_key.is_empty() && self.base_url().is_none() {
            anyhow::bail!(
                "OPENAI_API_KEY is required unless OPENAI_BASE_URL points to a local embedding server"
            );
        }
        Ok(())
    }
}
