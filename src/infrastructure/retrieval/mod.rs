//! Document loading, chunking and vector-store retrieval

mod chunker;
mod in_memory;
mod loader;
mod retriever;

pub use chunker::chunk_text;
pub use in_memory::InMemoryVectorStore;
pub use loader::{index_directory, load_directory, markdown_to_text};
pub use retriever::VectorStoreRetriever;
