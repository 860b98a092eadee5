use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{ContextRetriever, DomainError, VectorStore};

/// Retriever joining the top-k chunks of a vector store with newlines
#[derive(Debug, Clone)]
pub struct VectorStoreRetriever {
    store: Arc<dyn VectorStore>,
    top_k: usize,
}

impl VectorStoreRetriever {
    pub fn new(store: Arc<dyn VectorStore>, top_k: usize) -> Self {
        Self {
            store,
            top_k: top_k.max(1),
        }
    }
}

#[async_trait]
impl ContextRetriever for VectorStoreRetriever {
    async fn retrieve(&self, question: &str) -> Result<String, DomainError> {
        let chunks = self
            .store
            .similarity_search(question, self.top_k)
            .await
            .map_err(|e| match e {
                DomainError::Retrieval { .. } => e,
                other => DomainError::retrieval(other.to_string()),
            })?;

        debug!(chunks = chunks.len(), top_k = self.top_k, "Context retrieved");

        Ok(chunks
            .into_iter()
            .map(|chunk| chunk.content)
            .collect::<Vec<_>>()
            .join("\n"))
    }
}
