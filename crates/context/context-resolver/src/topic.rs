//! Topic change detection between a question and the current product context.

use std::sync::Arc;

use budtender_core::{cosine_similarity, ProductContext};
use embedding::EmbeddingService;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, instrument, warn};

use crate::product_name::get_product_name;
use crate::strain_name::StrainNameExtractor;

/// Question/description similarity at or above which the question stays on topic.
pub const DEFAULT_TOPIC_THRESHOLD: f32 = 0.75;

/// Phrases that refer back to the product already under discussion.
pub const FOLLOW_UP_INDICATORS: &[&str] = &[
    "it",
    "its",
    "this strain",
    "that strain",
    "this one",
    "that one",
    "effects",
    "effect",
    "taste",
    "flavor",
    "flavour",
    "smell",
    "aroma",
    "thc",
    "cbd",
    "potency",
    "strong",
    "dosage",
];

static FOLLOW_UP: Lazy<Regex> = Lazy::new(|| {
    let alternatives = FOLLOW_UP_INDICATORS
        .iter()
        .map(|phrase| regex::escape(phrase).replace(' ', r"\s+"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternatives)).expect("follow-up pattern is valid")
});

/// Cannabis vocabulary that suggests the question names some product.
static PRODUCT_CUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:strains?|kush|haze|og|diesel|cookies?|indica|sativa|hybrid|dream|purple|widow|skunk|cheese|gelato|cake|express|lights|glue|cough|products?)\b",
    )
    .expect("product cue pattern is valid")
});

/// True when the question contains a follow-up indicator on word boundaries.
pub fn has_follow_up_indicator(question: &str) -> bool {
    FOLLOW_UP.is_match(question)
}

/// True when the question plausibly names a product: cannabis vocabulary or an extractable
/// strain name.
pub fn references_product(question: &str) -> bool {
    PRODUCT_CUE.is_match(question) || StrainNameExtractor::default().extract(question).is_some()
}

/// Decides whether a question moves the conversation to a different product.
#[derive(Clone)]
pub struct TopicChangeDetector {
    embedding: Arc<dyn EmbeddingService>,
    threshold: f32,
}

impl TopicChangeDetector {
    pub fn new(embedding: Arc<dyn EmbeddingService>) -> Self {
        Self {
            embedding,
            threshold: DEFAULT_TOPIC_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Cosine similarity between the question and the product description embeddings.
    pub async fn similarity(&self, question: &str, description: &str) -> anyhow::Result<f32> {
        let question_vec = self.embedding.embed(question).await?;
        let description_vec = self.embedding.embed(description).await?;
        Ok(cosine_similarity(&question_vec, &description_vec))
    }

    /// Returns true when `question` is about a different product than `current`.
    ///
    /// With no current context the answer is always true. Follow-up wording, the current
    /// product's name, or high similarity keep the topic. A low-similarity question that names
    /// no product also keeps it. Similarity failures keep the topic.
    #[instrument(skip(self, current), fields(current_id = current.map(|c| c.id.as_str())))]
    pub async fn is_new_topic(&self, question: &str, current: Option<&ProductContext>) -> bool {
        let Some(current) = current else {
            return true;
        };

        if has_follow_up_indicator(question) {
            debug!("Follow-up indicator found, staying on topic");
            return false;
        }

        let name = get_product_name(&current.description);
        if question.to_lowercase().contains(&name.to_lowercase()) {
            debug!(name = %name, "Current product named in question, staying on topic");
            return false;
        }

        let similarity = match self.similarity(question, &current.description).await {
            Ok(similarity) => similarity,
            Err(e) => {
                warn!(error = %e, "Topic similarity failed, staying on topic");
                return false;
            }
        };
        debug!(similarity, threshold = self.threshold, "Topic similarity");
        if similarity >= self.threshold {
            return false;
        }

        if !references_product(question) {
            debug!("No product reference in question, staying on topic");
            return false;
        }

        true
    }
}
