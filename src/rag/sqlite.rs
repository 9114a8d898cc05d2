//! SQLite-backed vector store.
//!
//! In-process stand-in for a hosted pgvector table: metadata in SQLite,
//! embeddings as little-endian f32 blobs, nearest-neighbor search by
//! brute-force cosine distance.

use std::path::PathBuf;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};

use super::store::{NearestChunk, RecordId, StoredRecord, VectorStore};
use crate::core::errors::RagError;

pub struct SqliteVectorStore {
    pool: SqlitePool,
}

impl SqliteVectorStore {
    pub async fn new(db_path: PathBuf) -> Result<Self, RagError> {
        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(RagError::store_write)?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), RagError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS papers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                summary TEXT,
                chunk TEXT NOT NULL,
                embedding BLOB NOT NULL,
                created_at TEXT NOT NULL DEFAULT (STRFTIME('%Y-%m-%dT%H:%M:%fZ', 'now'))
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(RagError::store_write)?;

        Ok(())
    }

    fn serialize_embedding(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    fn deserialize_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect()
    }

    /// Cosine distance (1 - cosine similarity). Mismatched or zero vectors
    /// score the neutral distance 1.0 instead of erroring.
    fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() || a.is_empty() {
            return 1.0;
        }

        let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        let denom = norm_a * norm_b;

        if denom <= f32::EPSILON {
            1.0
        } else {
            1.0 - dot / denom
        }
    }
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    async fn insert(&self, record: StoredRecord) -> Result<RecordId, RagError> {
        let blob = Self::serialize_embedding(&record.embedding);

        let result = sqlx::query(
            "INSERT INTO papers (title, summary, chunk, embedding)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&record.title)
        .bind(&record.summary)
        .bind(&record.chunk)
        .bind(&blob)
        .execute(&self.pool)
        .await
        .map_err(RagError::store_write)?;

        Ok(result.last_insert_rowid())
    }

    async fn nearest(
        &self,
        query_embedding: &[f32],
        k: usize,
    ) -> Result<Vec<NearestChunk>, RagError> {
        let rows = sqlx::query("SELECT chunk, embedding FROM papers")
            .fetch_all(&self.pool)
            .await
            .map_err(RagError::store_query)?;

        let mut scored: Vec<NearestChunk> = rows
            .iter()
            .map(|row| {
                let embedding_bytes: Vec<u8> = row.get("embedding");
                let stored = Self::deserialize_embedding(&embedding_bytes);

                NearestChunk {
                    chunk: row.get("chunk"),
                    distance: Self::cosine_distance(query_embedding, &stored),
                }
            })
            .collect();

        scored.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k.max(1));

        Ok(scored)
    }

    async fn count(&self) -> Result<usize, RagError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM papers")
            .fetch_one(&self.pool)
            .await
            .map_err(RagError::store_query)?;

        Ok(count as usize)
    }
}
