//! Direct catalog search, health reporting and index refresh.

use std::path::PathBuf;
use std::sync::Arc;

use budtender_core::ProductIndex;
use catalog_index::InMemoryProductIndex;
use embedding::EmbeddingService;
use llm_client::LlmClient;
use serde::Serialize;
use storage::ProductRepository;
use thiserror::Error;
use tracing::{info, instrument, warn};

pub const DEFAULT_SEARCH_K: usize = 3;
pub const MAX_SEARCH_K: usize = 20;
pub const MAX_QUERY_CHARS: usize = 500;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Query parameter is required")]
    EmptyQuery,

    #[error("Query text is too long ({len} characters, max {max})")]
    QueryTooLong { len: usize, max: usize },

    #[error("Parameter k must be at least 1")]
    InvalidK,

    #[error("Search failed: {0}")]
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub description: String,
    /// `1 - distance`
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub k: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "lowercase")]
pub enum ComponentStatus {
    Ok,
    Unavailable(String),
    Skipped,
}

impl ComponentStatus {
    pub fn is_ok(&self) -> bool {
        !matches!(self, ComponentStatus::Unavailable(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub database: ComponentStatus,
    pub index: ComponentStatus,
    pub generator: ComponentStatus,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.database.is_ok() && self.index.is_ok() && self.generator.is_ok()
    }
}

/// Catalog-level operations outside the dialogue flow.
#[derive(Clone)]
pub struct SearchService {
    embedding: Arc<dyn EmbeddingService>,
    index: Arc<InMemoryProductIndex>,
    repo: Arc<ProductRepository>,
    generator: Option<Arc<dyn LlmClient>>,
    snapshot_path: Option<PathBuf>,
}

impl SearchService {
    pub fn new(
        embedding: Arc<dyn EmbeddingService>,
        index: Arc<InMemoryProductIndex>,
        repo: Arc<ProductRepository>,
    ) -> Self {
        Self {
            embedding,
            index,
            repo,
            generator: None,
            snapshot_path: None,
        }
    }

    /// Includes generator readiness in health reports.
    pub fn with_generator(mut self, generator: Arc<dyn LlmClient>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn with_snapshot_path(mut self, path: Option<PathBuf>) -> Self {
        self.snapshot_path = path;
        self
    }

    /// Nearest products to `query`. `k` defaults to 3 and is capped at 20.
    ///
    /// Hits whose product lookup fails are skipped with a warning.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        query: &str,
        k: Option<usize>,
    ) -> Result<SearchResponse, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            warn!("Empty query received");
            return Err(SearchError::EmptyQuery);
        }
        let len = query.chars().count();
        if len > MAX_QUERY_CHARS {
            warn!(len, "Query too long");
            return Err(SearchError::QueryTooLong {
                len,
                max: MAX_QUERY_CHARS,
            });
        }
        let k = k.unwrap_or(DEFAULT_SEARCH_K).min(MAX_SEARCH_K);
        if k == 0 {
            return Err(SearchError::InvalidK);
        }

        let vector = self
            .embedding
            .embed(query)
            .await
            .map_err(|e| SearchError::Failed(e.to_string()))?;
        let neighbors = self
            .index
            .search(&vector, k)
            .await
            .map_err(|e| SearchError::Failed(e.to_string()))?;

        let mut results = Vec::with_capacity(neighbors.len());
        for neighbor in neighbors {
            match self.index.get_by_id(neighbor.candidate_id).await {
                Ok(product) => results.push(SearchHit {
                    id: product.id,
                    description: product.description,
                    score: 1.0 - neighbor.distance,
                }),
                Err(e) => {
                    warn!(candidate_id = neighbor.candidate_id, error = %e, "Product lookup failed");
                }
            }
        }

        info!(count = results.len(), "Search completed");
        Ok(SearchResponse {
            query: query.to_string(),
            k,
            results,
        })
    }

    /// Database ping, index non-empty, and generator readiness when configured.
    #[instrument(skip(self))]
    pub async fn health(&self) -> HealthReport {
        let database = match self.repo.ping().await {
            Ok(()) => ComponentStatus::Ok,
            Err(e) => ComponentStatus::Unavailable(e.to_string()),
        };
        let index = if self.index.candidate_count().await > 0 {
            ComponentStatus::Ok
        } else {
            ComponentStatus::Unavailable("index is empty".to_string())
        };
        let generator = match &self.generator {
            Some(generator) => match generator.check_ready().await {
                Ok(()) => ComponentStatus::Ok,
                Err(e) => ComponentStatus::Unavailable(e.to_string()),
            },
            None => ComponentStatus::Skipped,
        };

        let report = HealthReport {
            database,
            index,
            generator,
        };
        if !report.is_healthy() {
            warn!(?report, "Health check failed");
        }
        report
    }

    /// Reloads the catalog from storage and rebuilds the index; returns the product count.
    #[instrument(skip(self))]
    pub async fn refresh_index(&self) -> anyhow::Result<usize> {
        info!("Refreshing index");
        let products = self.repo.load_contexts().await?;
        self.index
            .rebuild(
                products,
                self.embedding.as_ref(),
                self.snapshot_path.as_deref(),
            )
            .await
    }
}
