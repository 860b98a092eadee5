//! Application state shared by the HTTP handlers

use std::sync::Arc;

use crate::domain::VectorStore;
use crate::infrastructure::services::{PipelineService, SemanticCacheService};

#[derive(Debug, Clone)]
pub struct AppState {
    pub pipeline: Arc<PipelineService>,
    pub vector_store: Arc<dyn VectorStore>,
}

impl AppState {
    pub fn new(pipeline: Arc<PipelineService>, vector_store: Arc<dyn VectorStore>) -> Self {
        Self {
            pipeline,
            vector_store,
        }
    }

    pub fn cache(&self) -> &Arc<SemanticCacheService> {
        self.pipeline.cache()
    }
}
