//! Per-turn product context resolution.

use std::sync::Arc;

use budtender_core::{ProductContext, ProductIndex, SessionState};
use embedding::EmbeddingService;
use tracing::{info, instrument, warn};

use crate::product_name::{get_product_name, names_match, FALLBACK_PRODUCT_NAME};
use crate::retrieval::{ProductRetriever, Retrieval, RetrievalError};
use crate::strain_name::StrainNameExtractor;
use crate::topic::{references_product, TopicChangeDetector};

/// Grounding decision for one question.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Product that grounds the answer, if any.
    pub context: Option<ProductContext>,
    /// True only when `context` is a different product than the session's previous one.
    pub topic_changed: bool,
    /// Display name the answer must stay on.
    pub product_name: String,
    /// Strain name extracted from the question, lower-case.
    pub strain_name: Option<String>,
}

/// Chooses the grounding product for each question.
#[derive(Clone)]
pub struct ContextResolver {
    extractor: StrainNameExtractor,
    detector: TopicChangeDetector,
    retriever: ProductRetriever,
}

impl ContextResolver {
    pub fn new(embedding: Arc<dyn EmbeddingService>, index: Arc<dyn ProductIndex>) -> Self {
        Self {
            extractor: StrainNameExtractor::default(),
            detector: TopicChangeDetector::new(embedding.clone()),
            retriever: ProductRetriever::new(embedding, index),
        }
    }

    /// Replaces the topic change detector (e.g. to tune its threshold).
    pub fn with_detector(mut self, detector: TopicChangeDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn retriever(&self) -> &ProductRetriever {
        &self.retriever
    }

    fn found_or_warn(result: Result<Retrieval, RetrievalError>, what: &str) -> Option<ProductContext> {
        match result {
            Ok(retrieval) => retrieval.into_product(),
            Err(e) => {
                warn!(error = %e, lookup = what, "Retrieval failed, treating as no match");
                None
            }
        }
    }

    /// Resolves the grounding context for `question`.
    ///
    /// 1. No previous context: fresh query retrieval.
    /// 2. Previous context: fresh retrieval only when the detector reports a new topic and
    ///    the question references a product; otherwise (or when nothing is found) keep it.
    /// 3. An extracted strain name that differs from the chosen product's name forces a named
    ///    lookup, which replaces the context when it succeeds.
    ///
    /// `topic_changed` is computed against the session's previous context, so it is only true
    /// when the chosen product differs from it.
    #[instrument(skip(self, session), fields(has_context = session.and_then(|s| s.product_context.as_ref()).is_some()))]
    pub async fn resolve(&self, question: &str, session: Option<&SessionState>) -> Resolution {
        let previous = session.and_then(|s| s.product_context.as_ref());

        let mut context = match previous {
            None => Self::found_or_warn(self.retriever.retrieve_by_query(question).await, "query"),
            Some(current) => {
                let switch = self.detector.is_new_topic(question, Some(current)).await
                    && references_product(question);
                let fresh = if switch {
                    Self::found_or_warn(self.retriever.retrieve_by_query(question).await, "query")
                } else {
                    None
                };
                Some(fresh.unwrap_or_else(|| current.clone()))
            }
        };

        let strain_name = self.extractor.extract(question);
        if let Some(name) = &strain_name {
            let already_named = context
                .as_ref()
                .is_some_and(|c| names_match(&get_product_name(&c.description), name));
            if !already_named {
                if let Some(found) =
                    Self::found_or_warn(self.retriever.retrieve_by_name(name).await, "name")
                {
                    info!(strain = %name, id = %found.id, "Explicit strain overrides context");
                    context = Some(found);
                }
            }
        }

        let topic_changed = match (&context, previous) {
            (Some(chosen), Some(prev)) => !chosen.same_product(prev),
            (Some(_), None) => true,
            (None, _) => false,
        };

        let product_name = match (&context, &strain_name) {
            (Some(c), _) => get_product_name(&c.description),
            (None, Some(name)) => name.clone(),
            (None, None) => FALLBACK_PRODUCT_NAME.to_string(),
        };

        info!(
            context_id = context.as_ref().map(|c| c.id.as_str()),
            topic_changed,
            product_name = %product_name,
            "Context resolved"
        );

        Resolution {
            context,
            topic_changed,
            product_name,
            strain_name,
        }
    }
}
