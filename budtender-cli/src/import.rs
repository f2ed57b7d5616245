//! Product import from JSON.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use storage::ProductRecord;

#[derive(Debug, Deserialize)]
struct ImportedProduct {
    id: Option<String>,
    description: String,
}

/// Parses a JSON array of products; entries without an id get a generated one.
pub fn parse_products(json: &str) -> Result<Vec<ProductRecord>> {
    let products: Vec<ImportedProduct> =
        serde_json::from_str(json).context("Expected a JSON array of {\"id\"?, \"description\"}")?;
    Ok(products
        .into_iter()
        .map(|p| match p.id.filter(|id| !id.trim().is_empty()) {
            Some(id) => ProductRecord::new(id, p.description),
            None => ProductRecord::with_generated_id(p.description),
        })
        .collect())
}

pub async fn read_products(path: &Path) -> Result<Vec<ProductRecord>> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_products(&json)
}
