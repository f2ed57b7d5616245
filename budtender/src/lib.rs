//! # budtender
//!
//! Answers customer questions about cannabis products, grounded on one catalog description per
//! turn and aware of the conversation so far.
//!
//! ## Modules
//!
//! - [`config`] – AppConfig loaded from env
//! - [`components`] – builds storage, index, embedding and generator from config
//! - [`orchestrator`] – DialogueTurnOrchestrator: resolve, compose, generate
//! - [`chat`] – ChatService: orchestrator plus session store
//! - [`search`] – SearchService: direct search, health, index refresh

pub mod chat;
pub mod components;
pub mod config;
pub mod orchestrator;
pub mod search;

pub use chat::ChatService;
pub use components::{
    build_components, build_components_unindexed, build_components_unindexed_with,
    build_components_with, create_embedding, create_generator, AppComponents,
};
pub use config::AppConfig;
pub use orchestrator::{DialogueTurnOrchestrator, APOLOGY_ANSWER};
pub use search::{
    ComponentStatus, HealthReport, SearchError, SearchHit, SearchResponse, SearchService,
    DEFAULT_SEARCH_K, MAX_QUERY_CHARS, MAX_SEARCH_K,
};
