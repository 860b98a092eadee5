//! Vector store abstraction

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// A chunk of source text with its similarity to the query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub content: String,
    pub score: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ScoredChunk {
    pub fn new(content: impl Into<String>, score: f32) -> Self {
        Self {
            content: content.into(),
            score,
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// A document chunk ready to be indexed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkInput {
    pub content: String,
    pub source: Option<String>,
}

impl ChunkInput {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Similarity search over indexed chunks
#[async_trait]
pub trait VectorStore: Send + Sync + Debug {
    /// Top `k` chunks by descending similarity to `query`
    async fn similarity_search(&self, query: &str, k: usize)
    -> Result<Vec<ScoredChunk>, DomainError>;

    /// Index chunks, returning how many were added
    async fn add_documents(&self, chunks: Vec<ChunkInput>) -> Result<usize, DomainError>;

    /// Number of indexed chunks
    async fn len(&self) -> Result<usize, DomainError>;
}
