//! Shared mocks for context-resolver integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use budtender_core::{
    cosine_distance, CandidateId, IndexError, Neighbor, ProductContext, ProductIndex,
    SessionState,
};
use embedding::EmbeddingService;

/// Vocabulary axes of [`KeywordEmbedding`].
pub const AXES: [&str; 11] = [
    "blue", "dream", "og", "kush", "lemon", "haze", "berry", "citrus", "pine", "sleep", "energy",
];

pub const BLUE_DREAM: &str = "Blue Dream is a sativa-dominant hybrid with sweet berry notes.";
pub const BUBBA_KUSH: &str = "Bubba Kush is an indica bred from OG Kush.";
pub const OG_KUSH: &str =
    "OG Kush, also known as Premium OG, is the og kush strain with pine, lemon, and citrus.";
pub const LEMON_HAZE: &str = "Lemon Haze is a citrus sativa with lemon zest.";

/// Deterministic embedding: word counts over [`AXES`], with per-text overrides.
#[derive(Default)]
pub struct KeywordEmbedding {
    overrides: Mutex<HashMap<String, Vec<f32>>>,
    pub embed_calls: AtomicUsize,
}

impl KeywordEmbedding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vector(text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        AXES.iter()
            .map(|axis| words.iter().filter(|w| *w == axis).count() as f32)
            .collect()
    }

    /// Makes `text` embed exactly like `like`.
    pub fn alias(self, text: &str, like: &str) -> Self {
        self.overrides
            .lock()
            .unwrap()
            .insert(text.to_string(), Self::vector(like));
        self
    }

    pub fn calls(&self) -> usize {
        self.embed_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingService for KeywordEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error> {
        self.embed_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(v) = self.overrides.lock().unwrap().get(text) {
            return Ok(v.clone());
        }
        Ok(Self::vector(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }
}

/// Embedding service that always fails.
pub struct FailingEmbedding;

#[async_trait]
impl EmbeddingService for FailingEmbedding {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, anyhow::Error> {
        Err(anyhow::anyhow!("embedding backend unavailable"))
    }

    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        Err(anyhow::anyhow!("embedding backend unavailable"))
    }
}

/// Brute-force index over [`KeywordEmbedding`] vectors; counts calls.
#[derive(Default)]
pub struct MockIndex {
    products: Vec<ProductContext>,
    vectors: Vec<Vec<f32>>,
    pub search_calls: AtomicUsize,
    pub scan_calls: AtomicUsize,
}

impl MockIndex {
    pub fn new(products: Vec<ProductContext>) -> Self {
        let vectors = products
            .iter()
            .map(|p| KeywordEmbedding::vector(&p.description))
            .collect();
        Self {
            products,
            vectors,
            ..Default::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn searches(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn scans(&self) -> usize {
        self.scan_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProductIndex for MockIndex {
    async fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, IndexError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.products.is_empty() {
            return Err(IndexError::NotInitialized);
        }
        let mut neighbors: Vec<Neighbor> = self
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
        self.products
            .get(candidate_id)
            .cloned()
            .ok_or(IndexError::UnknownCandidate(candidate_id))
    }

    async fn all_candidates(&self) -> Result<Vec<ProductContext>, IndexError> {
        self.scan_calls.fetch_add(1, Ordering::SeqCst);
        if self.products.is_empty() {
            return Err(IndexError::NotInitialized);
        }
        Ok(self.products.clone())
    }

    async fn candidate_count(&self) -> usize {
        self.products.len()
    }
}

/// Catalog in index order: Blue Dream, Bubba Kush, OG Kush, Lemon Haze.
pub fn catalog() -> Vec<ProductContext> {
    vec![
        ProductContext::new("blue-dream", BLUE_DREAM),
        ProductContext::new("bubba-kush", BUBBA_KUSH),
        ProductContext::new("og-kush", OG_KUSH),
        ProductContext::new("lemon-haze", LEMON_HAZE),
    ]
}

pub fn product(id: &str) -> ProductContext {
    catalog()
        .into_iter()
        .find(|p| p.id == id)
        .expect("product id is in the test catalog")
}

pub fn session_on(id: &str) -> SessionState {
    SessionState::with_context(product(id))
}

pub fn catalog_index() -> Arc<MockIndex> {
    Arc::new(MockIndex::new(catalog()))
}
