//! Storage abstraction behind the semantic cache

use std::fmt::Debug;

use async_trait::async_trait;

use super::CacheRecord;
use crate::domain::DomainError;

/// Persistence for cache records
///
/// Implementations must never return expired records from `live_records` or
/// `get`, whether or not they have physically evicted them yet.
#[async_trait]
pub trait SemanticCacheStore: Send + Sync + Debug {
    /// Short backend name for logs and health output
    fn backend_name(&self) -> &'static str;

    /// Store a record under its id, replacing any record with the same id.
    /// The store stamps the insertion sequence.
    async fn put(&self, record: CacheRecord) -> Result<(), DomainError>;

    /// All non-expired records in ascending sequence order
    async fn live_records(&self) -> Result<Vec<CacheRecord>, DomainError>;

    /// Get a non-expired record by id
    async fn get(&self, id: &str) -> Result<Option<CacheRecord>, DomainError>;

    /// Delete a record by id
    async fn delete(&self, id: &str) -> Result<bool, DomainError>;

    /// Remove every record in the namespace, returning how many were removed
    async fn clear(&self) -> Result<usize, DomainError>;

    /// Physically remove expired records
    async fn purge_expired(&self) -> Result<usize, DomainError>;

    /// Number of non-expired records
    async fn len(&self) -> Result<usize, DomainError>;

    /// Check that the backend is reachable
    async fn ping(&self) -> Result<(), DomainError>;
}
