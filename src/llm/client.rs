use async_trait::async_trait;

use crate::core::errors::RagError;

/// Maps text to a fixed-dimensionality vector via a remote model.
///
/// The dimensionality is decided by the model; all embeddings stored in one
/// vector store must come from the same model.
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError>;
}

/// Produces a chat completion for a rendered prompt.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, RagError>;
}
