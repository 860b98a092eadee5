//! Domain layer - Core business logic and entities

pub mod audit;
pub mod embedding;
pub mod error;
pub mod guardrails;
pub mod llm;
pub mod metrics;
pub mod pipeline;
pub mod prompt;
pub mod retrieval;
pub mod semantic_cache;
pub mod similarity;

pub use audit::{AuditRecord, AuditSink, NoopAuditSink};
pub use embedding::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
pub use error::DomainError;
pub use guardrails::{GuardrailFilter, PostProcessor};
pub use llm::{
    FinishReason, LlmProvider, LlmRequest, LlmRequestBuilder, LlmResponse, Message, MessageRole,
    Usage,
};
pub use metrics::{MetricSink, NoopMetricSink};
pub use pipeline::{PipelineOutcome, PipelineRequest, Stage, StageLatencies};
pub use prompt::{PromptRouter, PromptTemplate, RoutedPrompt, TemplateError};
pub use retrieval::{ChunkInput, ContextRetriever, ScoredChunk, VectorStore};
pub use semantic_cache::{
    CacheBackend, CacheHit, CacheRecord, SemanticCacheConfig, SemanticCacheStats,
    SemanticCacheStore,
};
pub use similarity::{cosine_similarity, SimilarityError};
