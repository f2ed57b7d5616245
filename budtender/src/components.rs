//! Component factory: builds AppComponents from config. Isolates assembly logic from the CLI.

use anyhow::{Context, Result};
use catalog_index::InMemoryProductIndex;
use chrono::Duration;
use context_resolver::{ContextResolver, TopicChangeDetector};
use embedding::EmbeddingService;
use llm_client::{mask_token, EnvLlmConfig, GeneratorProvider, LlmClient, OllamaLlmClient, OpenAILlmClient};
use openai_embedding::OpenAIEmbedding;
use session_store::InMemorySessionStore;
use std::sync::Arc;
use storage::ProductRepository;
use tracing::{error, info, instrument, warn};

use crate::chat::ChatService;
use crate::config::AppConfig;
use crate::orchestrator::DialogueTurnOrchestrator;
use crate::search::SearchService;

/// Long-lived collaborators shared by every turn; produced by the component factory.
#[derive(Clone)]
pub struct AppComponents {
    pub config: AppConfig,
    pub repo: Arc<ProductRepository>,
    pub embedding: Arc<dyn EmbeddingService>,
    pub index: Arc<InMemoryProductIndex>,
    pub generator: Arc<dyn LlmClient>,
    pub sessions: Arc<InMemorySessionStore>,
}

/// Creates the OpenAI-compatible embedding service from config.
pub fn create_embedding(config: &AppConfig) -> Result<Arc<dyn EmbeddingService>> {
    config.embedding.validate()?;
    let embedding = OpenAIEmbedding::from_config(&config.embedding);
    info!(model = %embedding.model(), "Using OpenAI-compatible embedding service");
    Ok(Arc::new(embedding))
}

/// Creates the answer generator selected by GENERATOR_PROVIDER.
pub fn create_generator(config: &EnvLlmConfig) -> Result<Arc<dyn LlmClient>> {
    let generator: Arc<dyn LlmClient> = match config.provider {
        GeneratorProvider::Ollama => {
            info!(url = %config.ollama_url, model = %config.ollama_model, "Using Ollama generator");
            Arc::new(
                OllamaLlmClient::new(config.ollama_url.clone(), config.ollama_model.clone())
                    .context("Failed to create Ollama client")?,
            )
        }
        GeneratorProvider::OpenAI => {
            info!(
                model = %config.openai_model,
                api_key = %mask_token(&config.openai_api_key),
                "Using OpenAI generator"
            );
            Arc::new(
                OpenAILlmClient::with_base_url(
                    config.openai_api_key.clone(),
                    config.openai_base_url.as_deref(),
                )
                .with_model(config.openai_model.clone()),
            )
        }
    };
    Ok(generator)
}

/// Builds AppComponents with real adapters from config.
#[instrument(skip(config))]
pub async fn build_components(config: &AppConfig) -> Result<AppComponents> {
    config.validate().context("Invalid configuration")?;
    let embedding = create_embedding(config)?;
    let generator = create_generator(&config.llm)?;
    build_components_with(config, embedding, generator).await
}

/// Builds AppComponents with real adapters, leaving the index empty.
///
/// For callers that rebuild the index themselves right away (index refresh).
#[instrument(skip(config))]
pub async fn build_components_unindexed(config: &AppConfig) -> Result<AppComponents> {
    config.validate().context("Invalid configuration")?;
    let embedding = create_embedding(config)?;
    let generator = create_generator(&config.llm)?;
    build_components_unindexed_with(config, embedding, generator).await
}

/// Builds AppComponents around the given embedding service and generator.
///
/// Opens the catalog database and builds the index from it. An empty catalog leaves the index
/// empty (searches report it as not initialized) instead of failing startup.
#[instrument(skip(config, embedding, generator))]
pub async fn build_components_with(
    config: &AppConfig,
    embedding: Arc<dyn EmbeddingService>,
    generator: Arc<dyn LlmClient>,
) -> Result<AppComponents> {
    let components = build_components_unindexed_with(config, embedding, generator).await?;

    let products = components
        .repo
        .load_contexts()
        .await
        .context("Failed to load products")?;
    if products.is_empty() {
        warn!("Product catalog is empty; import products and refresh the index");
    } else {
        components
            .index
            .rebuild(
                products,
                components.embedding.as_ref(),
                config.index_file.as_deref(),
            )
            .await
            .context("Failed to build product index")?;
    }

    Ok(components)
}

/// Opens the catalog database and wires collaborators around an empty index.
pub async fn build_components_unindexed_with(
    config: &AppConfig,
    embedding: Arc<dyn EmbeddingService>,
    generator: Arc<dyn LlmClient>,
) -> Result<AppComponents> {
    let repo = Arc::new(
        ProductRepository::new(&config.database_url)
            .await
            .map_err(|e| {
                error!(
                    error = %e,
                    database_url = %config.database_url,
                    "Failed to initialize product storage"
                );
                anyhow::anyhow!("Failed to initialize product storage: {}", e)
            })?,
    );

    let sessions = Arc::new(InMemorySessionStore::new(Duration::minutes(
        config.session_timeout_minutes,
    )));

    Ok(AppComponents {
        config: config.clone(),
        repo,
        embedding,
        index: Arc::new(InMemoryProductIndex::new()),
        generator,
        sessions,
    })
}

impl AppComponents {
    pub fn resolver(&self) -> ContextResolver {
        let detector = TopicChangeDetector::new(self.embedding.clone())
            .with_threshold(self.config.topic_threshold);
        ContextResolver::new(self.embedding.clone(), self.index.clone()).with_detector(detector)
    }

    pub fn orchestrator(&self) -> DialogueTurnOrchestrator {
        DialogueTurnOrchestrator::new(self.resolver(), self.generator.clone())
    }

    pub fn chat_service(&self) -> ChatService {
        ChatService::new(
            self.orchestrator(),
            self.sessions.clone(),
            self.config.session_history_limit,
        )
    }

    pub fn search_service(&self) -> SearchService {
        SearchService::new(self.embedding.clone(), self.index.clone(), self.repo.clone())
            .with_generator(self.generator.clone())
            .with_snapshot_path(self.config.index_file.clone())
    }
}
