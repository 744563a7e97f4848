use async_trait::async_trait;
use pgvector::Vector;
use serde_json::{Map, Value};

#[derive(Debug)]
pub enum VectorIndexError {
    NetworkError(String),
    ApiError(String),
}

impl std::fmt::Display for VectorIndexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VectorIndexError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            VectorIndexError::ApiError(msg) => write!(f, "API error: {}", msg),
        }
    }
}

impl std::error::Error for VectorIndexError {}

/// One vector to upsert. Metadata must already satisfy the index's schema:
/// no nulls, arrays of strings only.
#[derive(Debug, Clone)]
pub struct VectorRecord {
    pub id: String,
    pub values: Vector,
    pub metadata: Map<String, Value>,
}

/// A nearest-neighbor hit, ordered by the index's own descending score.
#[derive(Debug, Clone)]
pub struct VectorMatch {
    pub id: String,
    pub score: f32,
    pub metadata: Map<String, Value>,
}

/// Equality filter over one metadata field, e.g. restricting a search to a
/// single user's authored chunks.
#[derive(Debug, Clone)]
pub struct MetadataFilter {
    pub field: String,
    pub value: Value,
}

impl MetadataFilter {
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn upsert(&self, records: &[VectorRecord]) -> Result<(), VectorIndexError>;

    async fn query(
        &self,
        vector: &Vector,
        top_k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<VectorMatch>, VectorIndexError>;

    async fn delete(&self, ids: &[String]) -> Result<(), VectorIndexError>;

    /// Exhaustive id listing, used by reconciliation to find orphaned
    /// vectors. Backed by the index's real listing API, not a zero-vector
    /// nearest-neighbor approximation.
    async fn list_ids(&self) -> Result<Vec<String>, VectorIndexError>;
}
