//! # budtender-core
//!
//! Core types for grounded product Q&A: [`ProductContext`], [`SessionState`], [`TurnOutcome`],
//! the [`ProductIndex`] port implemented by vector index adapters, error types,
//! and tracing initialization. Transport-agnostic; used by every other crate in the workspace.

pub mod error;
pub mod index;
pub mod logger;
pub mod types;

pub use error::{BudtenderError, IndexError, Result};
pub use index::{cosine_distance, cosine_similarity, CandidateId, Neighbor, ProductIndex};
pub use logger::init_tracing;
pub use types::{
    ConversationTurn, ProductContext, RetrievalResult, SessionState, TurnOutcome,
    DEFAULT_HISTORY_LIMIT,
};
