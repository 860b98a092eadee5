//! In-memory semantic cache store

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::semantic_cache::{now_millis, CacheRecord, SemanticCacheStore};
use crate::domain::DomainError;

/// Process-local store backed by a locked map
///
/// Suitable for a single instance. Capacity is bounded by `max_entries`;
/// once full, expired records go first, then the oldest insertion.
#[derive(Debug)]
pub struct InMemorySemanticCacheStore {
    records: RwLock<HashMap<String, CacheRecord>>,
    max_entries: usize,
    sequence: AtomicU64,
    evictions: AtomicU64,
}

impl InMemorySemanticCacheStore {
    pub fn new(max_entries: usize) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            max_entries: max_entries.max(1),
            sequence: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    /// Make room for one more record
    fn evict_if_needed(&self, records: &mut HashMap<String, CacheRecord>) {
        if records.len() < self.max_entries {
            return;
        }

        let now = now_millis();
        records.retain(|_, r| !r.is_expired_at(now));

        if records.len() < self.max_entries {
            return;
        }

        if let Some(oldest_id) = records
            .iter()
            .min_by_key(|(_, r)| r.sequence())
            .map(|(id, _)| id.clone())
        {
            records.remove(&oldest_id);
            self.evictions.fetch_add(1, Ordering::Relaxed);
            debug!(record_id = %oldest_id, "Evicted oldest cache record");
        }
    }
}

#[async_trait]
impl SemanticCacheStore for InMemorySemanticCacheStore {
    fn backend_name(&self) -> &'static str {
        "in_memory"
    }

    async fn put(&self, record: CacheRecord) -> Result<(), DomainError> {
        record.ttl_for_write()?;

        let mut records = self.records.write().map_err(|e| {
            DomainError::internal(format!("Failed to acquire write lock: {}", e))
        })?;

        let now = now_millis();
        let dims = record.embedding().len();

        if let Some(existing) = records.values().find(|r| !r.is_expired_at(now)) {
            if existing.embedding().len() != dims {
                return Err(DomainError::cache(format!(
                    "Embedding dimension mismatch: store holds {}, record has {}",
                    existing.embedding().len(),
                    dims
                )));
            }
        }

        if !records.contains_key(record.id()) {
            self.evict_if_needed(&mut records);
        }

        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let record = record.with_sequence(sequence);
        records.insert(record.id().to_string(), record);

        Ok(())
    }

    async fn live_records(&self) -> Result<Vec<CacheRecord>, DomainError> {
        let records = self.records.read().map_err(|e| {
            DomainError::internal(format!("Failed to acquire read lock: {}", e))
        })?;

        let now = now_millis();
        let mut live: Vec<CacheRecord> = records
            .values()
            .filter(|r| !r.is_expired_at(now))
            .cloned()
            .collect();

        live.sort_by_key(CacheRecord::sequence);

        Ok(live)
    }

    async fn get(&self, id: &str) -> Result<Option<CacheRecord>, DomainError> {
        let records = self.records.read().map_err(|e| {
            DomainError::internal(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(records.get(id).filter(|r| !r.is_expired()).cloned())
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let mut records = self.records.write().map_err(|e| {
            DomainError::internal(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(records.remove(id).is_some())
    }

    async fn clear(&self) -> Result<usize, DomainError> {
        let mut records = self.records.write().map_err(|e| {
            DomainError::internal(format!("Failed to acquire write lock: {}", e))
        })?;

        let count = records.len();
        records.clear();

        Ok(count)
    }

    async fn purge_expired(&self) -> Result<usize, DomainError> {
        let mut records = self.records.write().map_err(|e| {
            DomainError::internal(format!("Failed to acquire write lock: {}", e))
        })?;

        let now = now_millis();
        let before = records.len();
        records.retain(|_, r| !r.is_expired_at(now));

        Ok(before - records.len())
    }

    async fn len(&self) -> Result<usize, DomainError> {
        let records = self.records.read().map_err(|e| {
            DomainError::internal(format!("Failed to acquire read lock: {}", e))
        })?;

        let now = now_millis();
        Ok(records.values().filter(|r| !r.is_expired_at(now)).count())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
