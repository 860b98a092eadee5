//! Infrastructure services

mod pipeline_service;
mod semantic_cache_service;

pub use pipeline_service::{PipelineDeps, PipelineService, PipelineSettings};
pub use semantic_cache_service::SemanticCacheService;
