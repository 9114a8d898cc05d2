use std::env;
use std::fs;

use serde::{Deserialize, Serialize};

use super::paths::AppPaths;

/// Runtime settings, loaded from `config.yml` in the data directory with
/// environment overrides. The API key is taken from the environment only and
/// is never written to disk or logged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Default chunk size in characters for document ingestion.
    pub chunk_size: usize,
    /// Number of nearest chunks retrieved per question.
    pub top_k: usize,
    pub embedding_model: String,
    pub completion_model: String,
    /// Base URL of the OpenAI-compatible API.
    pub api_base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            top_k: 3,
            embedding_model: "text-embedding-ada-002".to_string(),
            completion_model: "gpt-3.5-turbo".to_string(),
            api_base_url: "https://api.openai.com".to_string(),
            request_timeout_secs: 60,
        }
    }
}

impl Settings {
    pub fn load(paths: &AppPaths) -> Self {
        let mut settings = if paths.config_path.exists() {
            match fs::read_to_string(&paths.config_path) {
                Ok(contents) => match serde_yaml::from_str::<Settings>(&contents) {
                    Ok(parsed) => parsed,
                    Err(err) => {
                        tracing::warn!(
                            "Invalid config at {}: {}; using defaults",
                            paths.config_path.display(),
                            err
                        );
                        Settings::default()
                    }
                },
                Err(err) => {
                    tracing::warn!(
                        "Failed to read config at {}: {}; using defaults",
                        paths.config_path.display(),
                        err
                    );
                    Settings::default()
                }
            }
        } else {
            Settings::default()
        };

        if let Ok(base_url) = env::var("RAG_UPLOADER_API_BASE") {
            settings.api_base_url = base_url;
        }
        if let Ok(model) = env::var("RAG_UPLOADER_EMBEDDING_MODEL") {
            settings.embedding_model = model;
        }
        if let Ok(model) = env::var("RAG_UPLOADER_COMPLETION_MODEL") {
            settings.completion_model = model;
        }

        settings
    }

    pub fn api_key() -> Option<String> {
        env::var("OPENAI_API_KEY").ok().filter(|key| !key.is_empty())
    }
}
