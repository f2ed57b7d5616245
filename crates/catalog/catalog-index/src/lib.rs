//! # In-Memory Product Index
//!
//! Implements [`ProductIndex`] over the product catalog with brute-force cosine distance.
//!
//! ## Lifecycle
//!
//! 1. Descriptions are normalized with [`preprocess_description`] and embedded in one batch.
//! 2. When a snapshot path is configured and the snapshot was taken by the same embedding model
//!    over the same product ids and descriptions, in the same order, and the encoder still
//!    yields vectors of the snapshot's dimension, its vectors are reused; otherwise vectors are
//!    recomputed and the snapshot is rewritten.
//! 3. [`InMemoryProductIndex::rebuild`] swaps the contents in one write; readers see either
//!    the old or the new catalog, never a mix.
//!
//! ## Thread Safety
//!
//! Contents live behind `Arc<RwLock<>>`; searches take a read lock only.

mod preprocess;
mod snapshot;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use budtender_core::{
    cosine_distance, CandidateId, IndexError, Neighbor, ProductContext, ProductIndex,
};
use embedding::EmbeddingService;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

pub use preprocess::preprocess_description;
pub use snapshot::{description_hash, IndexSnapshot};

#[derive(Debug, Default)]
struct IndexData {
    products: Vec<ProductContext>,
    vectors: Vec<Vec<f32>>,
}

impl IndexData {
    fn new(products: Vec<ProductContext>, vectors: Vec<Vec<f32>>) -> Result<Self, IndexError> {
        if products.len() != vectors.len() {
            return Err(IndexError::Backend(format!(
                "{} products but {} vectors",
                products.len(),
                vectors.len()
            )));
        }
        if let Some(first) = vectors.first() {
            let expected = first.len();
            if let Some(bad) = vectors.iter().find(|v| v.len() != expected) {
                return Err(IndexError::DimensionMismatch {
                    expected,
                    actual: bad.len(),
                });
            }
        }
        Ok(Self { products, vectors })
    }

    fn dimension(&self) -> Option<usize> {
        self.vectors.first().map(|v| v.len())
    }
}

/// In-memory vector index over product descriptions.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductIndex {
    data: Arc<RwLock<IndexData>>,
}

impl InMemoryProductIndex {
    /// Creates an empty index. Searches fail with [`IndexError::NotInitialized`] until built.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an index from precomputed vectors (one per product, same order).
    pub fn from_parts(
        products: Vec<ProductContext>,
        vectors: Vec<Vec<f32>>,
    ) -> Result<Self, IndexError> {
        let data = IndexData::new(products, vectors)?;
        Ok(Self {
            data: Arc::new(RwLock::new(data)),
        })
    }

    /// Builds an index by embedding every product.
    pub async fn build(
        products: Vec<ProductContext>,
        embedding: &dyn EmbeddingService,
        snapshot_path: Option<&Path>,
    ) -> anyhow::Result<Self> {
        let index = Self::new();
        index.rebuild(products, embedding, snapshot_path).await?;
        Ok(index)
    }

    /// Replaces the index contents with `products`; returns the product count.
    ///
    /// Reuses the snapshot at `snapshot_path` when it matches, else embeds and rewrites it.
    /// An empty catalog is an error and leaves the current contents untouched.
    #[instrument(skip(self, products, embedding), fields(count = products.len()))]
    pub async fn rebuild(
        &self,
        products: Vec<ProductContext>,
        embedding: &dyn EmbeddingService,
        snapshot_path: Option<&Path>,
    ) -> anyhow::Result<usize> {
        if products.is_empty() {
            anyhow::bail!("No products found in the catalog");
        }

        let vectors = match snapshot_path {
            Some(path) => Self::reusable_vectors(&products, embedding, path).await,
            None => None,
        };

        let vectors = match vectors {
            Some(v) => v,
            None => {
                let texts: Vec<String> = products
                    .iter()
                    .map(|p| preprocess_description(&p.description))
                    .collect();
                let vectors = embedding.embed_batch(&texts).await?;
                if let Some(path) = snapshot_path {
                    let snapshot =
                        IndexSnapshot::new(embedding.model_id(), &products, vectors.clone());
                    if let Err(e) = snapshot.save(path).await {
                        warn!(path = %path.display(), error = %e, "Failed to save index snapshot");
                    }
                }
                vectors
            }
        };

        let data = IndexData::new(products, vectors)?;
        let count = data.products.len();
        *self.data.write().await = data;

        info!(count, "Index built");
        Ok(count)
    }

    /// Vectors from the snapshot at `path` when it was taken by the same model over the same
    /// descriptions, and the encoder still produces vectors of the snapshot's dimension.
    async fn reusable_vectors(
        products: &[ProductContext],
        embedding: &dyn EmbeddingService,
        path: &Path,
    ) -> Option<Vec<Vec<f32>>> {
        let snapshot = match IndexSnapshot::load(path).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                info!(path = %path.display(), error = %e, "No usable index snapshot, building");
                return None;
            }
        };
        if !snapshot.matches(products, embedding.model_id()) {
            warn!(path = %path.display(), "Index snapshot does not match catalog or model, rebuilding");
            return None;
        }

        let first = products.first()?;
        match embedding.embed(&preprocess_description(&first.description)).await {
            Ok(v) if v.len() == snapshot.dimension => Some(snapshot.vectors),
            Ok(v) => {
                warn!(
                    path = %path.display(),
                    expected = snapshot.dimension,
                    actual = v.len(),
                    "Index snapshot dimension differs from encoder, rebuilding"
                );
                None
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Encoder check failed, rebuilding");
                None
            }
        }
    }
}

#[async_trait]
impl ProductIndex for InMemoryProductIndex {
    async fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, IndexError> {
        let data = self.data.read().await;
        let dimension = data.dimension().ok_or(IndexError::NotInitialized)?;
        if query.len() != dimension {
            return Err(IndexError::DimensionMismatch {
                expected: dimension,
                actual: query.len(),
            });
        }

        let mut neighbors: Vec<Neighbor> = data
            .vectors
            .iter()
            .enumerate()
            .map(|(candidate_id, v)| Neighbor {
                candidate_id,
                distance: cosine_distance(query, v),
            })
            .collect();
        neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        neighbors.truncate(k);
        Ok(neighbors)
    }

    async fn get_by_id(&self, candidate_id: CandidateId) -> Result<ProductContext, IndexError> {
        let data = self.data.read().await;
        data.products
            .get(candidate_id)
            .cloned()
            .ok_or(IndexError::UnknownCandidate(candidate_id))
    }

    async fn all_candidates(&self) -> Result<Vec<ProductContext>, IndexError> {
        let data = self.data.read().await;
        if data.products.is_empty() {
            return Err(IndexError::NotInitialized);
        }
        Ok(data.products.clone())
    }

    async fn candidate_count(&self) -> usize {
        self.data.read().await.products.len()
    }
}
