//! Retrieval-augmented question answering with a semantic answer cache

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::api::AppState;
use crate::config::{AppConfig, AuditConfig, OPENAI_API_KEY_ENV};
use crate::domain::{AuditSink, MetricSink, NoopAuditSink, NoopMetricSink, VectorStore};
use crate::infrastructure::audit::{JsonlAuditSink, TracingAuditSink};
use crate::infrastructure::embedding::OpenAiEmbeddingProvider;
use crate::infrastructure::guardrails::{RegexGuardrail, SecureOutputProcessor};
use crate::infrastructure::llm::{HttpClient, OpenAiProvider};
use crate::infrastructure::observability::PrometheusMetricSink;
use crate::infrastructure::prompt::TemplatePromptRouter;
use crate::infrastructure::retrieval::{index_directory, InMemoryVectorStore, VectorStoreRetriever};
use crate::infrastructure::semantic_cache::SemanticCacheStoreFactory;
use crate::infrastructure::services::{
    PipelineDeps, PipelineService, PipelineSettings, SemanticCacheService,
};

/// Wire every collaborator from configuration.
///
/// Requires `OPENAI_API_KEY`. Documents under `retrieval.documents_dir` are
/// indexed before this returns.
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    config.validate().context("Invalid configuration")?;

    let api_key = AppConfig::openai_api_key()
        .with_context(|| format!("{} is not set", OPENAI_API_KEY_ENV))?;

    let embedding_client = HttpClient::with_timeout(config.timeouts.embedding())?;
    let embedding_provider = Arc::new(OpenAiEmbeddingProvider::with_base_url(
        embedding_client,
        api_key.clone(),
        config.embedding.base_url.clone(),
    ));

    let vector_store = Arc::new(InMemoryVectorStore::new(
        embedding_provider.clone(),
        config.embedding.model.clone(),
    ));
    if let Some(dir) = &config.retrieval.documents_dir {
        index_directory(vector_store.as_ref(), dir, config.retrieval.chunk_size)
            .await
            .with_context(|| format!("Failed to index documents in {}", dir.display()))?;
    }

    let cache_store = SemanticCacheStoreFactory::create(&config.cache).await;
    let cache = Arc::new(
        SemanticCacheService::new(
            cache_store,
            embedding_provider,
            config.embedding.model.clone(),
            config.cache.clone(),
        )
        .with_embedding_timeout(config.timeouts.embedding()),
    );

    let generation_client = HttpClient::with_timeout(config.timeouts.generation())?;
    let generator = Arc::new(OpenAiProvider::with_base_url(
        generation_client,
        api_key,
        config.llm.base_url.clone(),
    ));

    let metrics: Arc<dyn MetricSink> = if config.observability.metrics.enabled {
        Arc::new(PrometheusMetricSink)
    } else {
        Arc::new(NoopMetricSink)
    };

    let deps = PipelineDeps {
        cache,
        retriever: Arc::new(VectorStoreRetriever::new(
            vector_store.clone(),
            config.retrieval.top_k,
        )),
        router: Arc::new(TemplatePromptRouter::from_config(&config.llm)),
        generator,
        post_processor: Arc::new(SecureOutputProcessor::new()),
        guardrail: Arc::new(RegexGuardrail::new()),
        audit: create_audit_sink(&config.audit).await?,
        metrics,
    };

    let settings = PipelineSettings {
        similarity_threshold: config.cache.similarity_threshold,
        cache_ttl: config.cache.ttl(),
        retrieval_timeout: config.timeouts.retrieval(),
        generation_timeout: config.timeouts.generation(),
        temperature: Some(config.llm.temperature),
        max_tokens: Some(config.llm.max_tokens),
    };

    let pipeline = Arc::new(PipelineService::new(deps, settings));
    let vector_store: Arc<dyn VectorStore> = vector_store;

    info!(
        cache_backend = pipeline.cache().backend_name(),
        indexed_chunks = vector_store.len().await?,
        model = %config.llm.default_model,
        "Pipeline ready"
    );

    Ok(AppState::new(pipeline, vector_store))
}

async fn create_audit_sink(config: &AuditConfig) -> anyhow::Result<Arc<dyn AuditSink>> {
    if !config.enabled {
        return Ok(Arc::new(NoopAuditSink));
    }

    match &config.path {
        Some(path) => {
            let sink = JsonlAuditSink::open(path.clone()).await?;
            info!(path = %path.display(), "Audit records appended to file");
            Ok(Arc::new(sink))
        }
        None => Ok(Arc::new(TracingAuditSink::new())),
    }
}
