use anyhow::{Context, Result};
use context_resolver::DEFAULT_TOPIC_THRESHOLD;
use embedding::EnvEmbeddingConfig;
use llm_client::EnvLlmConfig;
use session_store::DEFAULT_SESSION_TIMEOUT_MINUTES;
use std::env;
use std::path::PathBuf;

use budtender_core::DEFAULT_HISTORY_LIMIT;

/// Full application config.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// DATABASE_URL: product catalog SQLite database (file path or `sqlite:` URL)
    pub database_url: String,
    /// INDEX_FILE: optional JSON snapshot of index vectors
    pub index_file: Option<PathBuf>,
    /// LOG_FILE
    pub log_file: String,
    /// SESSION_TIMEOUT_MINUTES
    pub session_timeout_minutes: i64,
    /// SESSION_HISTORY_LIMIT: exchanges kept per session
    pub session_history_limit: usize,
    /// TOPIC_THRESHOLD: similarity at or above which a question stays on topic
    pub topic_threshold: f32,
    pub embedding: EnvEmbeddingConfig,
    pub llm: EnvLlmConfig,
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(s) if !s.trim().is_empty() => s
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid {}: {} ({})", name, s, e)),
        _ => Ok(default),
    }
}

impl AppConfig {
    /// Load from environment variables.
    pub fn load() -> Result<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "./data/products.db".to_string());
        let index_file = env::var("INDEX_FILE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| "logs/budtender.log".to_string());
        let session_timeout_minutes =
            parse_var("SESSION_TIMEOUT_MINUTES", DEFAULT_SESSION_TIMEOUT_MINUTES)?;
        let session_history_limit = parse_var("SESSION_HISTORY_LIMIT", DEFAULT_HISTORY_LIMIT)?;
        let topic_threshold = parse_var("TOPIC_THRESHOLD", DEFAULT_TOPIC_THRESHOLD)?;
        let embedding =
            EnvEmbeddingConfig::from_env().context("Failed to load embedding config")?;
        let llm = EnvLlmConfig::from_env().context("Failed to load generator config")?;

        Ok(Self {
            database_url,
            index_file,
            log_file,
            session_timeout_minutes,
            session_history_limit,
            topic_threshold,
            embedding,
            llm,
        })
    }

    /// Validate value ranges and the embedding endpoint settings.
    pub fn validate(&self) -> Result<()> {
        if self.session_timeout_minutes <= 0 {
            anyhow::bail!("SESSION_TIMEOUT_MINUTES must be positive");
        }
        if self.session_history_limit == 0 {
            anyhow::bail!("SESSION_HISTORY_LIMIT must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.topic_threshold) {
            anyhow::bail!("TOPIC_THRESHOLD must be between 0 and 1");
        }
        self.embedding.validate()
    }
}
