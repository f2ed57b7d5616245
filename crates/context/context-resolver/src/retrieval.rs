//! Product retrieval by free-text query and by strain name.

use std::sync::Arc;

use budtender_core::{IndexError, ProductContext, ProductIndex, RetrievalResult};
use embedding::EmbeddingService;
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Neighbors fetched for a free-text query.
pub const QUERY_TOP_K: usize = 3;
/// Distance below which the top query hit is accepted.
pub const QUERY_MAX_DISTANCE: f32 = 0.5;
/// Distance below which a named embedding lookup is accepted.
pub const NAME_MAX_DISTANCE: f32 = 0.4;
/// Characters of each description searched for the words of a name.
pub const NAME_WORD_WINDOW: usize = 100;

#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Outcome of a lookup that completed without errors.
#[derive(Debug, Clone, PartialEq)]
pub enum Retrieval {
    Found(RetrievalResult),
    NotFound,
}

impl Retrieval {
    pub fn into_product(self) -> Option<ProductContext> {
        match self {
            Retrieval::Found(result) => Some(result.product),
            Retrieval::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Retrieval::Found(_))
    }
}

/// Stage of a named lookup that produced the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NameStage {
    Prefix,
    Words,
    Embedding,
}

fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '-' || c == '\''))
        .filter(|w| !w.is_empty())
}

/// Stage (a): description starts with the name, or contains `"<name> strain"`.
fn matches_prefix(description: &str, name: &str) -> bool {
    let lower = description.trim_start().to_lowercase();
    lower.starts_with(name) || lower.contains(&format!("{} strain", name))
}

/// Stage (b): every word of the name occurs within the first [`NAME_WORD_WINDOW`] characters.
fn matches_words(description: &str, name: &str) -> bool {
    let window: String = description
        .chars()
        .take(NAME_WORD_WINDOW)
        .collect::<String>()
        .to_lowercase();
    let window_words: Vec<&str> = words(&window).collect();
    let mut name_words = words(name).peekable();
    name_words.peek().is_some() && name_words.all(|w| window_words.contains(&w))
}

/// Looks products up in the index, by query embedding or by name.
#[derive(Clone)]
pub struct ProductRetriever {
    embedding: Arc<dyn EmbeddingService>,
    index: Arc<dyn ProductIndex>,
}

impl ProductRetriever {
    pub fn new(embedding: Arc<dyn EmbeddingService>, index: Arc<dyn ProductIndex>) -> Self {
        Self { embedding, index }
    }

    /// Nearest product to `text` and its distance.
    async fn nearest(&self, text: &str) -> Result<Option<(ProductContext, f32)>, RetrievalError> {
        let vector = self
            .embedding
            .embed(text)
            .await
            .map_err(|e| RetrievalError::Embedding(e.to_string()))?;
        let neighbors = self.index.search(&vector, QUERY_TOP_K).await?;
        let Some(top) = neighbors.first() else {
            return Ok(None);
        };
        let product = self.index.get_by_id(top.candidate_id).await?;
        Ok(Some((product, top.distance)))
    }

    /// Embeds the query and accepts the nearest product when its distance is below
    /// [`QUERY_MAX_DISTANCE`].
    #[instrument(skip(self))]
    pub async fn retrieve_by_query(&self, query: &str) -> Result<Retrieval, RetrievalError> {
        match self.nearest(query).await? {
            Some((product, distance)) if distance < QUERY_MAX_DISTANCE => {
                info!(id = %product.id, distance, "Query matched product");
                Ok(Retrieval::Found(RetrievalResult::from_distance(product, distance)))
            }
            Some((_, distance)) => {
                debug!(distance, "Nearest product too far for query");
                Ok(Retrieval::NotFound)
            }
            None => Ok(Retrieval::NotFound),
        }
    }

    /// Three-stage named lookup; the first stage with a match wins.
    ///
    /// (a) description prefix or `"<name> strain"` anywhere, (b) all words of the name near
    /// the start of the description, (c) embedding search on `"<name> strain"` accepted below
    /// [`NAME_MAX_DISTANCE`]. Stages (a) and (b) scan candidates in index order.
    #[instrument(skip(self))]
    pub async fn retrieve_by_name(&self, name: &str) -> Result<Retrieval, RetrievalError> {
        let name = normalize_name(name);
        if name.is_empty() {
            return Ok(Retrieval::NotFound);
        }

        let candidates = self.index.all_candidates().await?;
        let scans: [(NameStage, fn(&str, &str) -> bool); 2] = [
            (NameStage::Prefix, matches_prefix),
            (NameStage::Words, matches_words),
        ];
        for (stage, matches) in scans {
            if let Some(product) = candidates.iter().find(|p| matches(&p.description, &name)) {
                info!(id = %product.id, ?stage, "Name matched product");
                return Ok(Retrieval::Found(RetrievalResult::exact(product.clone())));
            }
        }

        let query = format!("{} strain", name);
        match self.nearest(&query).await? {
            Some((product, distance)) if distance < NAME_MAX_DISTANCE => {
                info!(
                    id = %product.id,
                    stage = ?NameStage::Embedding,
                    distance,
                    "Name matched product"
                );
                Ok(Retrieval::Found(RetrievalResult::from_distance(product, distance)))
            }
            _ => {
                debug!("No product matched name");
                Ok(Retrieval::NotFound)
            }
        }
    }
}
