//! Embedding-backed in-memory vector store

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::embedding::{EmbeddingProvider, EmbeddingRequest};
use crate::domain::similarity::cosine_similarity;
use crate::domain::{ChunkInput, DomainError, ScoredChunk, VectorStore};

const EMBED_BATCH_SIZE: usize = 64;

#[derive(Debug, Clone)]
struct IndexedChunk {
    chunk: ChunkInput,
    embedding: Vec<f32>,
}

/// Vector store that keeps chunk embeddings in memory and ranks by cosine
/// similarity with a full scan
#[derive(Debug)]
pub struct InMemoryVectorStore {
    provider: Arc<dyn EmbeddingProvider>,
    model: String,
    chunks: RwLock<Vec<IndexedChunk>>,
}

impl InMemoryVectorStore {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            chunks: RwLock::new(Vec::new()),
        }
    }

    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, DomainError> {
        let expected = texts.len();

        self.provider
            .embed(EmbeddingRequest::chunks(self.model.clone(), texts))
            .await?
            .into_exactly(expected)
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn similarity_search(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<ScoredChunk>, DomainError> {
        if k == 0 || query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let query_vector = self
            .provider
            .embed(EmbeddingRequest::question(self.model.clone(), query))
            .await?
            .into_single()?;

        let chunks = self
            .chunks
            .read()
            .map_err(|e| DomainError::internal(format!("Failed to acquire read lock: {}", e)))?;

        let mut scored: Vec<ScoredChunk> = chunks
            .iter()
            .filter_map(|indexed| match cosine_similarity(&query_vector, &indexed.embedding) {
                Ok(score) => {
                    let chunk = ScoredChunk::new(indexed.chunk.content.clone(), score);
                    Some(match &indexed.chunk.source {
                        Some(source) => chunk.with_source(source.clone()),
                        None => chunk,
                    })
                }
                Err(e) => {
                    debug!(error = %e, "Skipping unscorable chunk");
                    None
                }
            })
            .collect();

        // Stable sort keeps insertion order among equal scores
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(k);

        Ok(scored)
    }

    async fn add_documents(&self, chunks: Vec<ChunkInput>) -> Result<usize, DomainError> {
        let chunks: Vec<ChunkInput> = chunks
            .into_iter()
            .filter(|c| !c.content.trim().is_empty())
            .collect();

        let mut indexed = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(EMBED_BATCH_SIZE) {
            let texts = batch.iter().map(|c| c.content.clone()).collect();
            let vectors = self.embed(texts).await?;

            indexed.extend(
                batch
                    .iter()
                    .cloned()
                    .zip(vectors)
                    .map(|(chunk, embedding)| IndexedChunk { chunk, embedding }),
            );
        }

        let added = indexed.len();
        self.chunks
            .write()
            .map_err(|e| DomainError::internal(format!("Failed to acquire write lock: {}", e)))?
            .extend(indexed);

        Ok(added)
    }

    async fn len(&self) -> Result<usize, DomainError> {
        Ok(self
            .chunks
            .read()
            .map_err(|e| DomainError::internal(format!("Failed to acquire read lock: {}", e)))?
            .len())
    }
}
