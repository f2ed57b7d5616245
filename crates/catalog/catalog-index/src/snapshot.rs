//! JSON snapshot of index vectors, so restarts skip re-embedding an unchanged catalog.

use std::path::Path;

use budtender_core::ProductContext;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSnapshot {
    /// Embedding model that produced `vectors`.
    pub model: String,
    pub dimension: usize,
    /// Product ids in index order.
    pub ids: Vec<String>,
    /// SHA-256 of each description, same order as `ids`.
    pub hashes: Vec<String>,
    pub vectors: Vec<Vec<f32>>,
}

/// Hex SHA-256 of a product description.
pub fn description_hash(description: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(description.as_bytes());
    format!("{:x}", hasher.finalize())
}

impl IndexSnapshot {
    pub fn new(model: &str, products: &[ProductContext], vectors: Vec<Vec<f32>>) -> Self {
        Self {
            model: model.to_string(),
            dimension: vectors.first().map(|v| v.len()).unwrap_or(0),
            ids: products.iter().map(|p| p.id.clone()).collect(),
            hashes: products.iter().map(|p| description_hash(&p.description)).collect(),
            vectors,
        }
    }

    /// True when the snapshot was taken by `model` over exactly these products and
    /// descriptions, in this order, with vectors of one consistent dimension.
    pub fn matches(&self, products: &[ProductContext], model: &str) -> bool {
        self.model == model
            && self.ids.len() == products.len()
            && self.hashes.len() == products.len()
            && self.vectors.len() == products.len()
            && self.vectors.iter().all(|v| v.len() == self.dimension)
            && self
                .ids
                .iter()
                .zip(&self.hashes)
                .zip(products)
                .all(|((id, hash), p)| *id == p.id && *hash == description_hash(&p.description))
    }

    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let snapshot: Self = serde_json::from_slice(&bytes)?;
        info!(path = %path.display(), count = snapshot.ids.len(), model = %snapshot.model, "Loaded index snapshot");
        Ok(snapshot)
    }

    pub async fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let bytes = serde_json::to_vec(self)?;
        tokio::fs::write(path, bytes).await?;
        info!(path = %path.display(), count = self.ids.len(), "Saved index snapshot");
        Ok(())
    }
}
