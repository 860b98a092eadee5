//! Runtime selection of the semantic cache store

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::domain::semantic_cache::{CacheBackend, SemanticCacheConfig, SemanticCacheStore};

use super::{InMemorySemanticCacheStore, NoopSemanticCacheStore, RedisSemanticCacheStore};

const REDIS_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Factory for creating semantic cache stores
#[derive(Debug)]
pub struct SemanticCacheStoreFactory;

impl SemanticCacheStoreFactory {
    /// Build the configured store.
    ///
    /// Never fails: a Redis backend that cannot be reached degrades to the
    /// no-op store, so the service keeps answering without a cache.
    pub async fn create(config: &SemanticCacheConfig) -> Arc<dyn SemanticCacheStore> {
        match config.effective_backend() {
            CacheBackend::InMemory => {
                info!(max_entries = config.max_entries, "Using in-memory semantic cache");
                Arc::new(InMemorySemanticCacheStore::new(config.max_entries))
            }
            CacheBackend::Redis => {
                let Some(url) = config.redis_url.as_deref() else {
                    warn!("Redis cache backend selected without redis_url, caching disabled");
                    return Arc::new(NoopSemanticCacheStore);
                };

                match RedisSemanticCacheStore::connect(
                    url,
                    config.namespace.clone(),
                    REDIS_CONNECT_TIMEOUT,
                )
                .await
                {
                    Ok(store) => {
                        info!(namespace = %config.namespace, "Using Redis semantic cache");
                        Arc::new(store)
                    }
                    Err(e) => {
                        warn!(error = %e, "Redis unavailable, semantic caching disabled");
                        Arc::new(NoopSemanticCacheStore)
                    }
                }
            }
            CacheBackend::Disabled => {
                info!("Semantic caching disabled");
                Arc::new(NoopSemanticCacheStore)
            }
        }
    }
}
