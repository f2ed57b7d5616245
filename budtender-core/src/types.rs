//! Core types: product context, conversation turn, session state, retrieval result, turn outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of past exchanges a session keeps by default.
pub const DEFAULT_HISTORY_LIMIT: usize = 5;

/// One retrievable product. `description` is the canonical grounding text; the display name is
/// derived from it, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductContext {
    pub id: String,
    pub description: String,
}

impl ProductContext {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
        }
    }

    /// True when both values refer to the same catalog product.
    pub fn same_product(&self, other: &ProductContext) -> bool {
        self.id == other.id
    }
}

/// One past exchange (customer question and support answer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub question: String,
    pub answer: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    /// Creates a turn stamped with the current time.
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Caller-owned state of one conversation. Replaced, never mutated, between turns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub product_context: Option<ProductContext>,
    pub conversation_history: Vec<ConversationTurn>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session already grounded on `context`, with no history.
    pub fn with_context(context: ProductContext) -> Self {
        Self {
            product_context: Some(context),
            conversation_history: Vec::new(),
        }
    }

    /// Builds the state for the next turn from this one and the outcome of `question`.
    ///
    /// The turn is appended and only the last `history_limit` exchanges are kept. When the
    /// outcome carries no context (nothing resolved, or a degraded answer) the previous
    /// context is kept.
    pub fn advance(&self, question: &str, outcome: &TurnOutcome, history_limit: usize) -> Self {
        let product_context = outcome
            .context_used
            .clone()
            .or_else(|| self.product_context.clone());

        let mut conversation_history = self.conversation_history.clone();
        conversation_history.push(ConversationTurn::new(question, outcome.answer.clone()));
        if conversation_history.len() > history_limit {
            let excess = conversation_history.len() - history_limit;
            conversation_history.drain(..excess);
        }

        Self {
            product_context,
            conversation_history,
        }
    }
}

/// A product found by a search call. `similarity = 1 - distance`.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalResult {
    pub product: ProductContext,
    pub similarity: f32,
}

impl RetrievalResult {
    pub fn from_distance(product: ProductContext, distance: f32) -> Self {
        Self {
            product,
            similarity: (1.0 - distance).clamp(0.0, 1.0),
        }
    }

    /// A linear-scan text match; treated as an exact hit.
    pub fn exact(product: ProductContext) -> Self {
        Self {
            product,
            similarity: 1.0,
        }
    }
}

/// Result of one dialogue turn, handed back to the caller for persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub answer: String,
    pub context_used: Option<ProductContext>,
    pub topic_changed: bool,
}
