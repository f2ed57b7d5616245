//! Product repository: persistence and queries for the product catalog.
//!
//! Uses SqlitePoolManager and ProductRecord. Products are returned in insertion order, which
//! is also the order the vector index assigns candidate ids.

use async_trait::async_trait;
use budtender_core::ProductContext;
use tracing::{debug, info};

use crate::error::StorageError;
use crate::models::ProductRecord;
use crate::repository::Repository;
use crate::sqlite_pool::SqlitePoolManager;

const UPSERT_PRODUCT: &str = r#"
    INSERT INTO products (id, description, created_at)
    VALUES (?, ?, ?)
    ON CONFLICT(id) DO UPDATE SET description = excluded.description
"#;

#[derive(Clone)]
pub struct ProductRepository {
    pool_manager: SqlitePoolManager,
}

impl ProductRepository {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating products table if not exist");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id TEXT PRIMARY KEY,
                description TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(self.pool_manager.pool())
        .await?;

        Ok(())
    }

    fn validate(record: &ProductRecord) -> Result<(), StorageError> {
        if record.id.trim().is_empty() {
            return Err(StorageError::Invalid("product id is empty".to_string()));
        }
        if record.description.trim().is_empty() {
            return Err(StorageError::Invalid(format!(
                "product {} has an empty description",
                record.id
            )));
        }
        Ok(())
    }

    /// Inserts or replaces every record in one transaction; returns how many were written.
    pub async fn save_all(&self, records: &[ProductRecord]) -> Result<usize, StorageError> {
        for record in records {
            Self::validate(record)?;
        }

        let mut tx = self.pool_manager.pool().begin().await?;
        for record in records {
            sqlx::query(UPSERT_PRODUCT)
                .bind(&record.id)
                .bind(&record.description)
                .bind(record.created_at)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        info!(count = records.len(), "Saved products");
        Ok(records.len())
    }

    pub async fn count(&self) -> Result<i64, StorageError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool_manager.pool())
            .await?;
        Ok(count)
    }

    /// All products as retrievable contexts, in insertion order.
    pub async fn load_contexts(&self) -> Result<Vec<ProductContext>, StorageError> {
        let records = self.find_all().await?;
        Ok(records.into_iter().map(ProductContext::from).collect())
    }

    /// Connectivity check used by health checks.
    pub async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1")
            .execute(self.pool_manager.pool())
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Repository<ProductRecord> for ProductRepository {
    async fn save(&self, record: &ProductRecord) -> Result<(), StorageError> {
        Self::validate(record)?;

        sqlx::query(UPSERT_PRODUCT)
            .bind(&record.id)
            .bind(&record.description)
            .bind(record.created_at)
            .execute(self.pool_manager.pool())
            .await?;

        debug!(id = %record.id, "Saved product");
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ProductRecord>, StorageError> {
        let record = sqlx::query_as::<_, ProductRecord>(
            "SELECT id, description, created_at FROM products WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool_manager.pool())
        .await?;
        Ok(record)
    }

    async fn find_all(&self) -> Result<Vec<ProductRecord>, StorageError> {
        let records = sqlx::query_as::<_, ProductRecord>(
            "SELECT id, description, created_at FROM products ORDER BY rowid",
        )
        .fetch_all(self.pool_manager.pool())
        .await?;
        Ok(records)
    }

    async fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(self.pool_manager.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
