//! Semantic cache domain models and traits
//!
//! Answers are cached together with the embedding of the question they
//! answer, and looked up by similarity rather than by exact key.

mod config;
mod matching;
mod record;
mod store;

pub use config::{CacheBackend, SemanticCacheConfig};
pub use matching::{select_best, BestMatch, CacheHit, SemanticCacheStats};
pub use record::{now_millis, record_key, CacheRecord};
pub use store::SemanticCacheStore;

#[cfg(test)]
pub use store::mock::FailingSemanticCacheStore;
