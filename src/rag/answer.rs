//! Retrieval-and-answer pipeline.
//!
//! Embeds the question, pulls the nearest stored chunks, and asks the
//! completion model to answer from them. With no matching context the
//! sentinel answer is returned and the completion model is never called.

use std::sync::Arc;

use serde::Serialize;

use super::store::VectorStore;
use crate::core::errors::RagError;
use crate::llm::{CompletionClient, EmbeddingClient};

/// Answer returned when the store has no matching chunks.
pub const NO_CONTEXT_ANSWER: &str = "No matching context found.";

#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub question: String,
    pub answer: String,
}

pub struct AnswerPipeline {
    embedder: Arc<dyn EmbeddingClient>,
    completer: Arc<dyn CompletionClient>,
    store: Arc<dyn VectorStore>,
    top_k: usize,
}

impl AnswerPipeline {
    pub fn new(
        embedder: Arc<dyn EmbeddingClient>,
        completer: Arc<dyn CompletionClient>,
        store: Arc<dyn VectorStore>,
        top_k: usize,
    ) -> Self {
        Self {
            embedder,
            completer,
            store,
            top_k: top_k.max(1),
        }
    }

    pub async fn answer(&self, question: &str) -> Result<Answer, RagError> {
        let query_embedding = self.embedder.embed(question).await?;

        let nearest = self.store.nearest(&query_embedding, self.top_k).await?;
        tracing::debug!("Retrieved {} chunks for question", nearest.len());

        if nearest.is_empty() {
            return Ok(Answer {
                question: question.to_string(),
                answer: NO_CONTEXT_ANSWER.to_string(),
            });
        }

        // Nearest-first, separated by a blank line.
        let context = nearest
            .iter()
            .map(|hit| hit.chunk.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let prompt = build_prompt(&context, question);
        let answer = self.completer.complete(&prompt).await?;

        Ok(Answer {
            question: question.to_string(),
            answer,
        })
    }
}

fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "Answer the question based on the following documents:\n\n{}\n\nQ: {}\nA:",
        context, question
    )
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::rag::store::{NearestChunk, RecordId, StoredRecord};

    struct FixedEmbedder;

    #[async_trait]
    impl EmbeddingClient for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, RagError> {
            Ok(vec![1.0, 0.0])
        }
    }

    /// Completion client that records prompts and counts invocations.
    #[derive(Default)]
    struct SpyCompleter {
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CompletionClient for SpyCompleter {
        async fn complete(&self, prompt: &str) -> Result<String, RagError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok("They are used in solar cells.".to_string())
        }
    }

    struct FixedStore {
        hits: Vec<NearestChunk>,
    }

    #[async_trait]
    impl VectorStore for FixedStore {
        async fn insert(&self, _record: StoredRecord) -> Result<RecordId, RagError> {
            Ok(1)
        }

        async fn nearest(
            &self,
            _query_embedding: &[f32],
            k: usize,
        ) -> Result<Vec<NearestChunk>, RagError> {
            Ok(self.hits.iter().take(k).cloned().collect())
        }

        async fn count(&self) -> Result<usize, RagError> {
            Ok(self.hits.len())
        }
    }

    fn pipeline(hits: Vec<NearestChunk>) -> (AnswerPipeline, Arc<SpyCompleter>) {
        let completer = Arc::new(SpyCompleter::default());
        let pipeline = AnswerPipeline::new(
            Arc::new(FixedEmbedder),
            completer.clone(),
            Arc::new(FixedStore { hits }),
            3,
        );
        (pipeline, completer)
    }

    #[tokio::test]
    async fn empty_store_returns_sentinel_without_completion_call() {
        let (pipeline, completer) = pipeline(Vec::new());

        let answer = pipeline.answer("What are perovskites used for?").await.unwrap();

        assert_eq!(answer.answer, NO_CONTEXT_ANSWER);
        assert_eq!(completer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn prompt_contains_retrieved_chunk_verbatim() {
        let chunk = "Perovskites are used in solar cells due to their excellent \
                     light absorption properties.";
        let (pipeline, completer) = pipeline(vec![NearestChunk {
            chunk: chunk.to_string(),
            distance: 0.05,
        }]);

        let answer = pipeline.answer("What are perovskites used for?").await.unwrap();

        assert_eq!(answer.question, "What are perovskites used for?");
        assert_eq!(answer.answer, "They are used in solar cells.");

        let prompts = completer.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains(chunk));
        assert!(prompts[0].contains("Q: What are perovskites used for?"));
        assert!(prompts[0].ends_with("A:"));
    }

    #[tokio::test]
    async fn context_joins_chunks_nearest_first_with_blank_lines() {
        let hits = vec![
            NearestChunk { chunk: "closest".to_string(), distance: 0.1 },
            NearestChunk { chunk: "second".to_string(), distance: 0.4 },
            NearestChunk { chunk: "third".to_string(), distance: 0.7 },
        ];
        let (pipeline, completer) = pipeline(hits);

        pipeline.answer("q").await.unwrap();

        let prompts = completer.prompts.lock().unwrap();
        assert!(prompts[0].contains("closest\n\nsecond\n\nthird"));
    }

    #[tokio::test]
    async fn embedding_failure_surfaces_whole() {
        struct FailingEmbedder;

        #[async_trait]
        impl EmbeddingClient for FailingEmbedder {
            async fn embed(&self, _text: &str) -> Result<Vec<f32>, RagError> {
                Err(RagError::RemoteService("auth failure".to_string()))
            }
        }

        let completer = Arc::new(SpyCompleter::default());
        let pipeline = AnswerPipeline::new(
            Arc::new(FailingEmbedder),
            completer.clone(),
            Arc::new(FixedStore { hits: Vec::new() }),
            3,
        );

        let err = pipeline.answer("q").await.unwrap_err();
        assert!(matches!(err, RagError::RemoteService(_)));
        assert_eq!(completer.calls.load(Ordering::SeqCst), 0);
    }
}
