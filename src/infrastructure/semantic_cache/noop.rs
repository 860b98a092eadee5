//! Store used when caching is disabled or the backend is unreachable

use async_trait::async_trait;

use crate::domain::semantic_cache::{CacheRecord, SemanticCacheStore};
use crate::domain::DomainError;

/// Holds nothing: every read is empty and every write is discarded
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSemanticCacheStore;

#[async_trait]
impl SemanticCacheStore for NoopSemanticCacheStore {
    fn backend_name(&self) -> &'static str {
        "disabled"
    }

    async fn put(&self, _record: CacheRecord) -> Result<(), DomainError> {
        Ok(())
    }

    async fn live_records(&self) -> Result<Vec<CacheRecord>, DomainError> {
        Ok(Vec::new())
    }

    async fn get(&self, _id: &str) -> Result<Option<CacheRecord>, DomainError> {
        Ok(None)
    }

    async fn delete(&self, _id: &str) -> Result<bool, DomainError> {
        Ok(false)
    }

    async fn clear(&self) -> Result<usize, DomainError> {
        Ok(0)
    }

    async fn purge_expired(&self) -> Result<usize, DomainError> {
        Ok(0)
    }

    async fn len(&self) -> Result<usize, DomainError> {
        Ok(0)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_noop_discards_writes() {
        let store = NoopSemanticCacheStore;
        let record = CacheRecord::new("ns", "q", vec![1.0], "a", Duration::from_secs(60));
        let id = record.id().to_string();

        store.put(record).await.unwrap();

        assert!(store.get(&id).await.unwrap().is_none());
        assert!(store.live_records().await.unwrap().is_empty());
        assert_eq!(store.len().await.unwrap(), 0);
    }
}
