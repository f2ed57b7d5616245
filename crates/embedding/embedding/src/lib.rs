//! # Text Embeddings
//!
//! Embedding port used to encode product descriptions (index build) and customer
//! questions (retrieval and topic similarity).

use async_trait::async_trait;

mod config;
pub use config::{EmbeddingConfig, EnvEmbeddingConfig, DEFAULT_EMBEDDING_MODEL};

/// Service for generating text embeddings.
///
/// Implementations must return the same vector for identical input within a process lifetime.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// Generates an embedding vector for a single text string.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error>;

    /// Generates embedding vectors for multiple texts in a single call, in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error>;

    /// Identifier of the model behind the vectors. Persisted vectors are only reused for the
    /// same identifier.
    fn model_id(&self) -> &str {
        ""
    }
}
