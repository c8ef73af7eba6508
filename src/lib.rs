//! PMP Workflow Engine
//!
//! Executes no-code AI workflows described as node/edge graphs:
//! - Closed node set (input, knowledge base, LLM, output) with alias
//!   resolution for the builder's historical type spellings
//! - Deterministic topological scheduling
//! - Pluggable capabilities (embedding, vector store, generation with
//!   provider fallback, web search) injected at construction
//! - In-memory execution logs with live streaming and progress tracking

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{
    DomainError, ExecutionRequest, ExecutionResult, ExecutionStatus, LogEntry, WorkflowDefinition,
    WorkflowEngine,
};
pub use infrastructure::services::ExecutionLogService;
pub use infrastructure::workflow::DynamicWorkflowEngine;

use std::sync::Arc;

use domain::{Embedder, TextGenerator, VectorStore, WebSearch};
use infrastructure::embedding::{HashedEmbedder, OpenAiEmbedder};
use infrastructure::generation::{FallbackGenerator, GeminiBackend, OpenAiBackend};
use infrastructure::http_client::HttpClient;
use infrastructure::vector_store::InMemoryVectorStore;
use infrastructure::web_search::SerpApiSearch;
use tracing::info;

/// Assemble an engine from configuration.
///
/// Providers are wired from whichever API keys are present: Gemini is
/// the primary generation backend when configured, OpenAI the
/// secondary. Without an OpenAI key the engine embeds locally with the
/// deterministic hashed embedder. The web search adapter is always
/// attached; unconfigured it answers with an explanatory string.
pub fn create_engine(config: &AppConfig) -> anyhow::Result<DynamicWorkflowEngine> {
    let http_client = HttpClient::new();

    let embedder: Arc<dyn Embedder> = match &config.providers.openai_api_key {
        Some(key) => Arc::new(OpenAiEmbedder::new(http_client.clone(), key.clone())),
        None => Arc::new(HashedEmbedder::default()),
    };

    let store: Arc<dyn VectorStore> = Arc::new(InMemoryVectorStore::new());

    let mut generator = FallbackGenerator::new();
    if let Some(key) = &config.providers.gemini_api_key {
        generator = generator.with_backend(Arc::new(GeminiBackend::new(
            http_client.clone(),
            key.clone(),
        )));
    }
    if let Some(key) = &config.providers.openai_api_key {
        generator = generator.with_backend(Arc::new(OpenAiBackend::new(
            http_client.clone(),
            key.clone(),
        )));
    }
    let backends = generator.backend_names();
    let generator: Arc<dyn TextGenerator> = Arc::new(generator);

    let search: Arc<dyn WebSearch> = Arc::new(SerpApiSearch::new(
        http_client,
        config.providers.serpapi_api_key.clone(),
    ));

    let log_service = Arc::new(ExecutionLogService::new());

    info!(
        embedder = embedder.provider_name(),
        generation_backends = ?backends,
        web_search_configured = config.providers.serpapi_api_key.is_some(),
        "Workflow engine assembled"
    );

    Ok(DynamicWorkflowEngine::new(
        embedder,
        store,
        generator,
        Some(search),
        log_service,
    ))
}
