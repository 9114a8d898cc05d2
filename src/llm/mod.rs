pub mod client;
pub mod openai;
pub mod types;

pub use client::{CompletionClient, EmbeddingClient};
pub use openai::OpenAiProvider;
