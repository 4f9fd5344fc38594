//! Application state wiring all services together.
//!
//! Core services are generic over repository/embedder/media traits; AppState
//! pins them to the concrete infra implementations so the HTTP handlers and
//! CLI commands share one set of instances.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use mobilia_core::assistant::AssistantPipeline;
use mobilia_core::chat::service::ChatHistoryService;
use mobilia_core::vision::cache::FeatureCache;
use mobilia_infra::config::{database_url, load_config, media_root, openai_api_key, resolve_data_dir};
use mobilia_infra::llm::OpenAiCompletionService;
use mobilia_infra::media::LocalMediaStore;
use mobilia_infra::sqlite::{DatabasePool, SqliteCatalogRepository, SqliteChatRepository};
use mobilia_infra::vision::FastEmbedImageEmbedder;
use mobilia_types::config::AppConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteHistoryService = ChatHistoryService<SqliteChatRepository>;

pub type ConcreteFeatureCache =
    FeatureCache<FastEmbedImageEmbedder, SqliteCatalogRepository, LocalMediaStore>;

pub type ConcretePipeline =
    AssistantPipeline<OpenAiCompletionService, SqliteCatalogRepository, SqliteChatRepository>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<SqliteCatalogRepository>,
    pub history: Arc<ConcreteHistoryService>,
    pub feature_cache: Arc<ConcreteFeatureCache>,
    pub pipeline: Arc<ConcretePipeline>,
    pub config: AppConfig,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: load config, connect to the
    /// database, load the embedding model, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_config(&data_dir)?;
        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;

        let catalog = Arc::new(SqliteCatalogRepository::new(db_pool.clone()));
        let history = Arc::new(ChatHistoryService::new(SqliteChatRepository::new(
            db_pool.clone(),
        )));

        let embedder = FastEmbedImageEmbedder::new()?;
        let feature_cache = Arc::new(FeatureCache::new(
            embedder,
            SqliteCatalogRepository::new(db_pool.clone()),
            LocalMediaStore::new(media_root(&data_dir)),
            Duration::from_secs(config.search.cache_ttl_secs),
        ));

        let api_key = openai_api_key().unwrap_or_else(|| {
            warn!("OPENAI_API_KEY is not set; assistant requests will fail authentication");
            String::new()
        });
        let pipeline = Arc::new(AssistantPipeline::new(
            Arc::new(OpenAiCompletionService::new(&api_key)),
            Arc::clone(&catalog),
            Arc::clone(&history),
            config.assistant.clone(),
        ));

        Ok(Self {
            catalog,
            history,
            feature_cache,
            pipeline,
            config,
            data_dir,
            db_pool,
        })
    }
}
