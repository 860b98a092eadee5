//! Question answering pipeline
//!
//! Drives one request through the stage machine: cache check, then on a miss
//! retrieval, prompt building, generation, post-processing, guardrails and the
//! cache write. The cache write is the last step, so a failed or abandoned
//! request never leaves a partial answer behind.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::domain::llm::{LlmProvider, LlmRequest};
use crate::domain::metrics::{
    CACHE_HITS_TOTAL, CACHE_MISSES_TOTAL, LLM_LATENCY_MS, PIPELINE_FAILURES_TOTAL,
    PIPELINE_LATENCY_MS, RETRIEVAL_LATENCY_MS,
};
use crate::domain::{
    AuditRecord, AuditSink, ContextRetriever, DomainError, GuardrailFilter, MetricSink,
    PipelineOutcome, PipelineRequest, PostProcessor, PromptRouter, Stage, StageLatencies,
};

use super::SemanticCacheService;

/// Tunables consumed by the pipeline
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub similarity_threshold: f32,
    pub cache_ttl: Duration,
    pub retrieval_timeout: Duration,
    pub generation_timeout: Duration,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.90,
            cache_ttl: Duration::from_secs(1800),
            retrieval_timeout: Duration::from_secs(15),
            generation_timeout: Duration::from_secs(60),
            temperature: None,
            max_tokens: None,
        }
    }
}

/// Collaborators the pipeline calls, one per stage
#[derive(Clone)]
pub struct PipelineDeps {
    pub cache: Arc<SemanticCacheService>,
    pub retriever: Arc<dyn ContextRetriever>,
    pub router: Arc<dyn PromptRouter>,
    pub generator: Arc<dyn LlmProvider>,
    pub post_processor: Arc<dyn PostProcessor>,
    pub guardrail: Arc<dyn GuardrailFilter>,
    pub audit: Arc<dyn AuditSink>,
    pub metrics: Arc<dyn MetricSink>,
}

/// Orchestrates a single question from cache check to answer
#[derive(Clone)]
pub struct PipelineService {
    deps: PipelineDeps,
    settings: PipelineSettings,
}

impl fmt::Debug for PipelineService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineService")
            .field("cache", &self.deps.cache.backend_name())
            .field("generator", &self.deps.generator.provider_name())
            .field("settings", &self.settings)
            .finish()
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

impl PipelineService {
    pub fn new(deps: PipelineDeps, settings: PipelineSettings) -> Self {
        Self { deps, settings }
    }

    pub fn cache(&self) -> &Arc<SemanticCacheService> {
        &self.deps.cache
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    fn advance(&self, request_id: &str, stage: Stage, cache_hit: bool) -> Stage {
        let next = stage.next(cache_hit);
        debug!(request_id = %request_id, from = %stage, to = %next, "Pipeline stage");
        next
    }

    fn fail(&self, request_id: &str, stage: Stage, err: DomainError) -> DomainError {
        error!(request_id = %request_id, stage = %stage, error = %err, "Pipeline failed");
        self.deps.metrics.increment(PIPELINE_FAILURES_TOTAL);
        err
    }

    async fn retrieve(&self, question: &str) -> Result<String, DomainError> {
        let timeout = self.settings.retrieval_timeout;

        match tokio::time::timeout(timeout, self.deps.retriever.retrieve(question)).await {
            Err(_) => Err(DomainError::timeout(Stage::Retrieve.as_str(), timeout)),
            Ok(Err(e @ DomainError::Retrieval { .. })) => Err(e),
            Ok(Err(e)) => Err(DomainError::retrieval(e.to_string())),
            Ok(Ok(context)) => Ok(context),
        }
    }

    async fn generate(&self, model: &str, prompt: &str) -> Result<String, DomainError> {
        let timeout = self.settings.generation_timeout;

        let mut builder = LlmRequest::builder().user(prompt);
        if let Some(temperature) = self.settings.temperature {
            builder = builder.temperature(temperature);
        }
        if let Some(max_tokens) = self.settings.max_tokens {
            builder = builder.max_tokens(max_tokens);
        }

        match tokio::time::timeout(timeout, self.deps.generator.chat(model, builder.build())).await {
            Err(_) => Err(DomainError::timeout(Stage::Generate.as_str(), timeout)),
            Ok(Err(e @ DomainError::Generation { .. })) => Err(e),
            Ok(Err(e)) => Err(DomainError::generation(e.to_string())),
            Ok(Ok(response)) => Ok(response.content().to_string()),
        }
    }

    /// Answer one question.
    ///
    /// A cache hit returns the stored answer untouched. On a miss the fresh
    /// answer is cached and audited before returning. Retrieval and
    /// generation failures are returned; cache and audit failures are not.
    pub async fn run(&self, request: PipelineRequest) -> Result<PipelineOutcome, DomainError> {
        request.validate()?;

        let started = Instant::now();
        let request_id = request.request_id.as_str();
        let question = request.question.as_str();
        let mut latencies = StageLatencies::default();

        info!(request_id = %request_id, question = %question, "Starting pipeline");

        let mut stage = self.advance(request_id, Stage::Start, false);

        // CacheCheck
        let cache_started = Instant::now();
        let hit = self
            .deps
            .cache
            .lookup(question, self.settings.similarity_threshold)
            .await;
        latencies.cache_check_ms = elapsed_ms(cache_started);
        stage = self.advance(request_id, stage, hit.is_some());

        if let Some(hit) = hit {
            self.deps.metrics.increment(CACHE_HITS_TOTAL);
            latencies.total_ms = elapsed_ms(started);
            self.deps
                .metrics
                .record(PIPELINE_LATENCY_MS, latencies.total_ms as f64);

            info!(
                request_id = %request_id,
                similarity = hit.similarity,
                matched_question = %hit.matched_question,
                "Semantic cache hit"
            );
            debug_assert!(stage.is_terminal());

            return Ok(PipelineOutcome {
                request_id: request.request_id,
                answer: hit.answer,
                cache_hit: true,
                similarity: Some(hit.similarity),
                model: None,
                latencies,
            });
        }
        self.deps.metrics.increment(CACHE_MISSES_TOTAL);

        // Retrieve
        let retrieval_started = Instant::now();
        let context = self
            .retrieve(question)
            .await
            .map_err(|e| self.fail(request_id, stage, e))?;
        latencies.retrieval_ms = elapsed_ms(retrieval_started);
        self.deps
            .metrics
            .record(RETRIEVAL_LATENCY_MS, latencies.retrieval_ms as f64);
        info!(
            request_id = %request_id,
            latency_ms = latencies.retrieval_ms,
            context_chars = context.len(),
            "Context retrieved"
        );
        stage = self.advance(request_id, stage, false);

        // BuildPrompt
        let routed = self
            .deps
            .router
            .build(question, &context)
            .map_err(|e| self.fail(request_id, stage, e))?;
        stage = self.advance(request_id, stage, false);

        // Generate
        let generation_started = Instant::now();
        let raw_answer = self
            .generate(&routed.model, &routed.prompt)
            .await
            .map_err(|e| self.fail(request_id, stage, e))?;
        latencies.generation_ms = elapsed_ms(generation_started);
        self.deps
            .metrics
            .record(LLM_LATENCY_MS, latencies.generation_ms as f64);
        info!(
            request_id = %request_id,
            model = %routed.model,
            latency_ms = latencies.generation_ms,
            "Answer generated"
        );
        stage = self.advance(request_id, stage, false);

        // PostProcess, then Guardrail
        let post_processed = self.deps.post_processor.process(&raw_answer);
        stage = self.advance(request_id, stage, false);
        let final_answer = self.deps.guardrail.apply(&post_processed);
        stage = self.advance(request_id, stage, false);

        // CacheWrite
        let write_started = Instant::now();
        self.deps
            .cache
            .insert(question, &final_answer, self.settings.cache_ttl)
            .await;
        latencies.cache_write_ms = elapsed_ms(write_started);
        stage = self.advance(request_id, stage, false);

        let audit = AuditRecord {
            request_id: request.request_id.clone(),
            user_id: request.user_id.clone(),
            question: request.question.clone(),
            prompt: routed.prompt,
            post_processed,
            final_answer: final_answer.clone(),
            model: routed.model.clone(),
            latency_ms: latencies.retrieval_ms + latencies.generation_ms,
            retrieved_context: context,
            timestamp: Utc::now(),
        };
        if let Err(e) = self.deps.audit.record(audit).await {
            warn!(request_id = %request_id, error = %e, "Failed to write audit record");
        }

        latencies.total_ms = elapsed_ms(started);
        self.deps
            .metrics
            .record(PIPELINE_LATENCY_MS, latencies.total_ms as f64);
        debug_assert!(stage.is_terminal());

        Ok(PipelineOutcome {
            request_id: request.request_id,
            answer: final_answer,
            cache_hit: false,
            similarity: None,
            model: Some(routed.model),
            latencies,
        })
    }
}
