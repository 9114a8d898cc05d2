//! OpenAI-compatible HTTP provider.
//!
//! Talks to `/v1/embeddings` and `/v1/chat/completions` on a configurable
//! base URL, so it also works against local OpenAI-compatible servers.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::client::{CompletionClient, EmbeddingClient};
use super::types::ChatMessage;
use crate::core::config::Settings;
use crate::core::errors::RagError;

#[derive(Clone)]
pub struct OpenAiProvider {
    base_url: String,
    api_key: Option<String>,
    embedding_model: String,
    completion_model: String,
    client: Client,
}

impl OpenAiProvider {
    pub fn new(settings: &Settings, api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            api_key,
            embedding_model: settings.embedding_model.clone(),
            completion_model: settings.completion_model.clone(),
            client,
        }
    }

    fn post(&self, url: &str) -> reqwest::RequestBuilder {
        let mut builder = self.client.post(url);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        builder
    }
}

#[async_trait]
impl EmbeddingClient for OpenAiProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError> {
        let url = format!("{}/v1/embeddings", self.base_url);

        let body = json!({
            "model": self.embedding_model,
            "input": text,
        });

        let res = self
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(RagError::remote)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(RagError::RemoteService(format!(
                "embedding request failed ({}): {}",
                status, text
            )));
        }

        let payload: Value = res.json().await.map_err(RagError::remote)?;

        let embedding: Vec<f32> = payload["data"][0]["embedding"]
            .as_array()
            .map(|vals| {
                vals.iter()
                    .filter_map(|v| v.as_f64().map(|f| f as f32))
                    .collect()
            })
            .unwrap_or_default();

        if embedding.is_empty() {
            return Err(RagError::RemoteService(
                "embedding response contained no vector".to_string(),
            ));
        }

        Ok(embedding)
    }
}

#[async_trait]
impl CompletionClient for OpenAiProvider {
    async fn complete(&self, prompt: &str) -> Result<String, RagError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let body = json!({
            "model": self.completion_model,
            "messages": vec![ChatMessage::user(prompt)],
            "stream": false,
        });

        let res = self
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(RagError::remote)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(RagError::RemoteService(format!(
                "chat completion failed ({}): {}",
                status, text
            )));
        }

        let payload: Value = res.json().await.map_err(RagError::remote)?;

        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .to_string();

        Ok(content)
    }
}
