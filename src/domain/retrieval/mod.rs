//! Context retrieval for prompt construction

mod retriever;
mod vector_store;

pub use retriever::ContextRetriever;
pub use vector_store::{ChunkInput, ScoredChunk, VectorStore};

#[cfg(test)]
pub use retriever::MockContextRetriever;
