//! Application configuration: storage, index snapshot, logging, sessions, plus the embedding
//! and generator configs owned by their crates. Loaded from env.

mod app_config;


pub use app_config::AppConfig;
