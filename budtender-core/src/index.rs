//! Vector index port.
//!
//! The resolver only reads from the index; implementations must allow concurrent readers.

use async_trait::async_trait;

use crate::error::IndexError;
use crate::types::ProductContext;

/// Position of a product inside an index. Stable until the index is rebuilt.
pub type CandidateId = usize;

/// One nearest-neighbor hit. `distance` is a dissimilarity in `[0, ~2]`, 0 = identical.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub candidate_id: CandidateId,
    pub distance: f32,
}

/// Cosine similarity of two vectors; 0.0 for empty or zero-norm input.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Cosine distance (`1 - similarity`), in `[0, 2]`.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    1.0 - cosine_similarity(a, b)
}

/// Read access to the product vector index.
#[async_trait]
pub trait ProductIndex: Send + Sync {
    /// Returns up to `k` neighbors of `query`, ascending by distance.
    async fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, IndexError>;

    /// Returns the product stored under `candidate_id`.
    async fn get_by_id(&self, candidate_id: CandidateId) -> Result<ProductContext, IndexError>;

    /// Returns every product in a fixed order (index order). Used for linear-scan lookups.
    async fn all_candidates(&self) -> Result<Vec<ProductContext>, IndexError>;

    /// Number of indexed products.
    async fn candidate_count(&self) -> usize;
}
