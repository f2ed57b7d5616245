//! SQLite connection pool wrapper for the storage crate.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

/// Manages a single SQLite pool; creates the DB file (and its directory) if missing.
#[derive(Clone)]
pub struct SqlitePoolManager {
    pool: SqlitePool,
}

impl SqlitePoolManager {
    /// Creates a pool for the given database URL.
    ///
    /// Accepts `sqlite:` URLs (including `sqlite::memory:`) or a plain file path. In-memory
    /// databases use a single connection so every query sees the same data.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        info!(database_url, "Initializing SQLite pool");

        let in_memory = database_url.contains(":memory:");
        let options = if database_url.starts_with("sqlite:") {
            SqliteConnectOptions::from_str(database_url)?
        } else {
            if let Some(parent) = std::path::Path::new(database_url).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            SqliteConnectOptions::new().filename(database_url)
        };
        let options = options.create_if_missing(true);

        let max_connections = if in_memory { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Returns the underlying pool for running queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
