//! Storage crate: product catalog persistence and repository abstractions.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – ProductRecord
//! - [`repository`] – Repository trait
//! - [`product_repo`] – ProductRepository (SQLite)
//! - [`sqlite_pool`] – SqlitePoolManager

mod error;
mod models;
mod product_repo;
mod repository;
mod sqlite_pool;

pub use error::StorageError;
pub use models::ProductRecord;
pub use product_repo::ProductRepository;
pub use repository::Repository;
pub use sqlite_pool::SqlitePoolManager;
