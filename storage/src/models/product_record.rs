//! Product record model for persistence.
//!
//! Maps to the `products` table and is used by ProductRepository.

use budtender_core::ProductContext;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductRecord {
    pub id: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl ProductRecord {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            created_at: Utc::now(),
        }
    }

    /// Creates a record with a generated UUID.
    pub fn with_generated_id(description: impl Into<String>) -> Self {
        Self::new(Uuid::new_v4().to_string(), description)
    }
}

impl From<ProductRecord> for ProductContext {
    fn from(record: ProductRecord) -> Self {
        ProductContext::new(record.id, record.description)
    }
}
