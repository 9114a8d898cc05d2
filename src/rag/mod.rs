//! RAG (Retrieval-Augmented Generation) module.
//!
//! This module provides:
//! - `chunker`: fixed-size character chunking of uploaded documents
//! - `VectorStore`: abstract interface over the embedding store
//! - `IngestPipeline`: embeds chunks one at a time and persists them
//! - `AnswerPipeline`: embeds a question, retrieves nearest chunks, and asks
//!   the completion model to answer from them

pub mod answer;
pub mod chunker;
pub mod extract;
pub mod ingest;
pub mod sqlite;
pub mod store;

pub use answer::AnswerPipeline;
pub use ingest::IngestPipeline;
pub use sqlite::SqliteVectorStore;
pub use store::VectorStore;
