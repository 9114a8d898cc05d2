//! VectorStore trait — abstract interface for the embedding store.
//!
//! The production implementation is `SqliteVectorStore` in the `sqlite`
//! module; tests substitute in-memory fakes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::errors::RagError;

pub type RecordId = i64;

/// A row to persist: one chunk of a document plus its embedding.
///
/// The embedding dimensionality is fixed per store, dictated by the embedding
/// model in use. Records are immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRecord {
    pub title: String,
    pub summary: Option<String>,
    pub chunk: String,
    pub embedding: Vec<f32>,
}

/// One nearest-neighbor hit. Lower distance means closer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearestChunk {
    pub chunk: String,
    pub distance: f32,
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Persist a record, returning its identifier.
    async fn insert(&self, record: StoredRecord) -> Result<RecordId, RagError>;

    /// Return the `k` stored chunks nearest to `query_embedding`, ascending
    /// by distance.
    async fn nearest(
        &self,
        query_embedding: &[f32],
        k: usize,
    ) -> Result<Vec<NearestChunk>, RagError>;

    /// Total number of stored records.
    async fn count(&self) -> Result<usize, RagError>;
}
