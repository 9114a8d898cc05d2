//! Ingestion pipeline: embed each chunk and persist it.
//!
//! Processing is sequential and best-effort. A chunk that fails to embed or
//! insert is recorded in the report and skipped; later chunks still run.
//! Partial completion is a normal, reportable outcome.

use std::sync::Arc;

use serde::Serialize;

use super::store::{RecordId, StoredRecord, VectorStore};
use crate::llm::EmbeddingClient;

/// Outcome of one chunk.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChunkStatus {
    Stored { record_id: RecordId },
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ChunkReport {
    pub index: usize,
    #[serde(flatten)]
    pub status: ChunkStatus,
}

/// Batch report: every chunk attempted, with per-chunk outcomes.
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub title: String,
    pub attempted: usize,
    pub succeeded: usize,
    pub chunks: Vec<ChunkReport>,
}

impl IngestReport {
    pub fn failures(&self) -> impl Iterator<Item = &ChunkReport> {
        self.chunks
            .iter()
            .filter(|c| matches!(c.status, ChunkStatus::Failed { .. }))
    }
}

/// Observer hook for per-chunk progress, modeled after the experiment-logging
/// side channel some deployments attach. Not part of the ingestion contract;
/// the pipeline never depends on it.
pub trait IngestObserver: Send + Sync {
    fn on_chunk(&self, index: usize, status: &ChunkStatus);
    fn on_complete(&self, report: &IngestReport);
}

pub struct IngestPipeline {
    embedder: Arc<dyn EmbeddingClient>,
    store: Arc<dyn VectorStore>,
    observer: Option<Arc<dyn IngestObserver>>,
}

impl IngestPipeline {
    pub fn new(embedder: Arc<dyn EmbeddingClient>, store: Arc<dyn VectorStore>) -> Self {
        Self {
            embedder,
            store,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn IngestObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Embed and store every chunk in order, one at a time. No retries.
    pub async fn ingest(&self, title: &str, chunks: &[String]) -> IngestReport {
        let mut report = IngestReport {
            title: title.to_string(),
            attempted: chunks.len(),
            succeeded: 0,
            chunks: Vec::with_capacity(chunks.len()),
        };

        for (index, chunk) in chunks.iter().enumerate() {
            let status = match self.process_chunk(title, chunk).await {
                Ok(record_id) => {
                    report.succeeded += 1;
                    ChunkStatus::Stored { record_id }
                }
                Err(err) => {
                    tracing::warn!("Failed to ingest chunk {}: {}", index + 1, err);
                    ChunkStatus::Failed {
                        error: format!("chunk {}: {}", index + 1, err),
                    }
                }
            };

            if let Some(observer) = &self.observer {
                observer.on_chunk(index, &status);
            }
            report.chunks.push(ChunkReport { index, status });
        }

        tracing::info!(
            "Ingested '{}': {}/{} chunks stored",
            title,
            report.succeeded,
            report.attempted
        );

        if let Some(observer) = &self.observer {
            observer.on_complete(&report);
        }

        report
    }

    async fn process_chunk(
        &self,
        title: &str,
        chunk: &str,
    ) -> Result<RecordId, crate::core::errors::RagError> {
        let embedding = self.embedder.embed(chunk).await?;

        self.store
            .insert(StoredRecord {
                title: title.to_string(),
                summary: None,
                chunk: chunk.to_string(),
                embedding,
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::core::errors::RagError;
    use crate::rag::store::NearestChunk;

    /// Embeds everything as a unit vector, failing on configured indices.
    struct FlakyEmbedder {
        calls: AtomicUsize,
        fail_on: HashSet<usize>,
    }

    impl FlakyEmbedder {
        fn new(fail_on: impl IntoIterator<Item = usize>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_on: fail_on.into_iter().collect(),
            }
        }
    }

    #[async_trait]
    impl EmbeddingClient for FlakyEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, RagError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on.contains(&call) {
                Err(RagError::RemoteService(format!("rate limited on {}", call)))
            } else {
                Ok(vec![1.0, 0.0])
            }
        }
    }

    #[derive(Default)]
    struct RecordingStore {
        records: Mutex<Vec<StoredRecord>>,
    }

    #[async_trait]
    impl VectorStore for RecordingStore {
        async fn insert(&self, record: StoredRecord) -> Result<RecordId, RagError> {
            let mut records = self.records.lock().unwrap();
            records.push(record);
            Ok(records.len() as RecordId)
        }

        async fn nearest(
            &self,
            _query_embedding: &[f32],
            _k: usize,
        ) -> Result<Vec<NearestChunk>, RagError> {
            Ok(Vec::new())
        }

        async fn count(&self) -> Result<usize, RagError> {
            Ok(self.records.lock().unwrap().len())
        }
    }

    fn chunks(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("chunk {}", i)).collect()
    }

    #[tokio::test]
    async fn all_chunks_stored_on_success() {
        let store = Arc::new(RecordingStore::default());
        let pipeline = IngestPipeline::new(Arc::new(FlakyEmbedder::new([])), store.clone());

        let report = pipeline.ingest("Upload: notes.txt", &chunks(4)).await;

        assert_eq!(report.attempted, 4);
        assert_eq!(report.succeeded, 4);
        assert_eq!(report.failures().count(), 0);
        assert_eq!(store.count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn failed_chunks_are_skipped_not_fatal() {
        let store = Arc::new(RecordingStore::default());
        let pipeline = IngestPipeline::new(Arc::new(FlakyEmbedder::new([1, 3])), store.clone());

        let report = pipeline.ingest("doc", &chunks(5)).await;

        assert_eq!(report.attempted, 5);
        assert_eq!(report.succeeded, 3);

        let errors: Vec<String> = report
            .failures()
            .map(|c| match &c.status {
                ChunkStatus::Failed { error } => error.clone(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(errors.len(), 2);
        // Each failure carries its own message with the chunk position.
        assert_ne!(errors[0], errors[1]);
        assert!(errors[0].contains("chunk 2"));
        assert!(errors[1].contains("chunk 4"));

        // Only the successes were persisted, in order.
        let stored = store.records.lock().unwrap();
        let texts: Vec<&str> = stored.iter().map(|r| r.chunk.as_str()).collect();
        assert_eq!(texts, vec!["chunk 0", "chunk 2", "chunk 4"]);
    }

    #[tokio::test]
    async fn observer_sees_every_chunk_and_final_report() {
        #[derive(Default)]
        struct CountingObserver {
            chunk_events: AtomicUsize,
            completions: AtomicUsize,
        }

        impl IngestObserver for CountingObserver {
            fn on_chunk(&self, _index: usize, _status: &ChunkStatus) {
                self.chunk_events.fetch_add(1, Ordering::SeqCst);
            }

            fn on_complete(&self, _report: &IngestReport) {
                self.completions.fetch_add(1, Ordering::SeqCst);
            }
        }

        let observer = Arc::new(CountingObserver::default());
        let pipeline = IngestPipeline::new(
            Arc::new(FlakyEmbedder::new([0])),
            Arc::new(RecordingStore::default()),
        )
        .with_observer(observer.clone());

        pipeline.ingest("doc", &chunks(3)).await;

        assert_eq!(observer.chunk_events.load(Ordering::SeqCst), 3);
        assert_eq!(observer.completions.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_document_reports_zero_attempts() {
        let pipeline = IngestPipeline::new(
            Arc::new(FlakyEmbedder::new([])),
            Arc::new(RecordingStore::default()),
        );

        let report = pipeline.ingest("empty", &[]).await;
        assert_eq!(report.attempted, 0);
        assert_eq!(report.succeeded, 0);
        assert!(report.chunks.is_empty());
    }
}
