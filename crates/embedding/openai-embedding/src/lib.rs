//! # OpenAI-compatible Embedding Service
//!
//! Implements [`EmbeddingService`] over any endpoint that speaks the OpenAI embeddings API:
//! the hosted OpenAI API, or a local server such as Ollama (`http://localhost:11434/v1`).
//! Used to encode product descriptions when the catalog index is built and to encode
//! customer questions during retrieval and topic-change checks.
//!
//! ## Example
//!
//! ```rust,no_run
//! use openai_embedding::OpenAIEmbedding;
//! use embedding::EmbeddingService;
//!
//! async fn example() -> Result<(), anyhow::Error> {
//!     let service = OpenAIEmbedding::new_with_base_url(
//!         String::new(),
//!         "nomic-embed-text".to_string(),
//!         Some("http://localhost:11434/v1"),
//!     );
//!     let vector = service.embed("sweet candy flavor, lemon kush scent").await?;
//!     println!("dimension: {}", vector.len());
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use async_openai::{
    types::{CreateEmbeddingRequestArgs, EmbeddingInput},
    Client,
};
use async_trait::async_trait;
use embedding::{EmbeddingConfig, EmbeddingService, DEFAULT_EMBEDDING_MODEL};
use tracing::{debug, info, instrument, warn};

/// Timeout for a single-text request.
const EMBED_TIMEOUT: Duration = Duration::from_secs(30);
/// Timeout for a batch request (index builds send the whole catalog).
const EMBED_BATCH_TIMEOUT: Duration = Duration::from_secs(120);
const LOG_PREVIEW_LEN: usize = 120;

/// OpenAI-compatible embedding service. Holds the async-openai client and model name.
#[derive(Debug, Clone)]
pub struct OpenAIEmbedding {
    client: Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl OpenAIEmbedding {
    /// Creates a service against the default OpenAI API base.
    ///
    /// An empty `api_key` falls back to the OPENAI_API_KEY environment variable.
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_base_url(api_key, model, None)
    }

    /// Creates a service with an optional base URL (any OpenAI-compatible endpoint).
    pub fn new_with_base_url(api_key: String, model: String, base_url: Option<&str>) -> Self {
        let api_key = if api_key.is_empty() {
            std::env::var("OPENAI_API_KEY").unwrap_or_default()
        } else {
            api_key
        };

        let mut openai_config = async_openai::config::OpenAIConfig::new().with_api_key(api_key);
        if let Some(url) = base_url.filter(|s| !s.is_empty()) {
            openai_config = openai_config.with_api_base(url);
        }
        let client = Client::with_config(openai_config);

        Self { client, model }
    }

    /// Builds the service from an [`EmbeddingConfig`].
    pub fn from_config(config: &dyn EmbeddingConfig) -> Self {
        Self::new_with_base_url(
            config.api_key().to_string(),
            config.model().to_string(),
            config.base_url(),
        )
    }

    /// Creates a service with the default model.
    pub fn with_api_key(api_key: String) -> Self {
        Self::new(api_key, DEFAULT_EMBEDDING_MODEL.to_string())
    }

    /// Sets a different embedding model.
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    /// Returns the embedding model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends one embeddings request and returns vectors in input order.
    async fn request(
        &self,
        input: EmbeddingInput,
        expected: usize,
        timeout: Duration,
    ) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        let request = CreateEmbeddingRequestArgs::default()
            .model(self.model.clone())
            .input(input)
            .build()?;

        let embeddings = self.client.embeddings();
        let response = match tokio::time::timeout(timeout, embeddings.create(request)).await {
            Ok(Ok(r)) => {
                debug!("embeddings response received");
                r
            }
            Ok(Err(e)) => {
                warn!(error = %e, "embeddings request failed");
                return Err(e.into());
            }
            Err(_) => {
                warn!(timeout_secs = timeout.as_secs(), "embeddings request timed out");
                return Err(anyhow::anyhow!(
                    "Embeddings request timed out after {} seconds",
                    timeout.as_secs()
                ));
            }
        };

        let mut data = response.data;
        data.sort_by_key(|item| item.index);
        let vectors: Vec<Vec<f32>> = data.into_iter().map(|item| item.embedding).collect();

        if vectors.len() != expected {
            warn!(
                expected,
                got = vectors.len(),
                "embeddings response count mismatch"
            );
            anyhow::bail!("Expected {} embeddings, got {}", expected, vectors.len());
        }
        Ok(vectors)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

fn preview(text: &str) -> String {
    match text.char_indices().nth(LOG_PREVIEW_LEN) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[async_trait]
impl EmbeddingService for OpenAIEmbedding {
    #[instrument(skip(self, text), fields(model = %self.model, text_len = text.len()))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error> {
        debug!(text_preview = %preview(text), "embed request");

        let mut vectors = self
            .request(EmbeddingInput::String(text.to_string()), 1, EMBED_TIMEOUT)
            .await?;
        let vector = vectors
            .pop()
            .ok_or_else(|| anyhow::anyhow!("No embedding in response"))?;

        debug!(dimension = vector.len(), "embed done");
        Ok(vector)
    }

    #[instrument(skip(self, texts), fields(model = %self.model, batch_size = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        if texts.is_empty() {
            debug!("embed_batch empty input, skipping");
            return Ok(vec![]);
        }

        let vectors = self
            .request(
                EmbeddingInput::StringArray(texts.to_vec()),
                texts.len(),
                EMBED_BATCH_TIMEOUT,
            )
            .await?;

        info!(
            count = vectors.len(),
            dimension = vectors.first().map(|v| v.len()).unwrap_or(0),
            "embed_batch done"
        );
        Ok(vectors)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
