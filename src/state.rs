use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::core::config::{AppPaths, Settings};
use crate::llm::OpenAiProvider;
use crate::rag::{AnswerPipeline, IngestPipeline, SqliteVectorStore, VectorStore};

pub struct AppState {
    pub paths: Arc<AppPaths>,
    pub settings: Settings,
    pub store: Arc<dyn VectorStore>,
    pub ingest: IngestPipeline,
    pub answer: AnswerPipeline,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub async fn initialize() -> anyhow::Result<Arc<Self>> {
        let paths = Arc::new(AppPaths::new());
        let settings = Settings::load(&paths);

        let api_key = Settings::api_key();
        if api_key.is_none() {
            tracing::warn!("OPENAI_API_KEY is not set; remote calls will fail");
        }

        let provider = Arc::new(OpenAiProvider::new(&settings, api_key));
        let store: Arc<dyn VectorStore> =
            Arc::new(SqliteVectorStore::new(paths.db_path.clone()).await?);

        let ingest = IngestPipeline::new(provider.clone(), store.clone());
        let answer = AnswerPipeline::new(
            provider.clone(),
            provider.clone(),
            store.clone(),
            settings.top_k,
        );

        Ok(Arc::new(AppState {
            paths,
            settings,
            store,
            ingest,
            answer,
            started_at: Utc::now(),
        }))
    }
}
