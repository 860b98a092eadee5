//! Redis semantic cache store

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use tracing::warn;

use crate::domain::semantic_cache::{now_millis, CacheRecord, SemanticCacheStore};
use crate::domain::DomainError;

const SCAN_COUNT: usize = 100;
const MGET_BATCH: usize = 100;

/// Store that keeps each record as a JSON string under `<namespace>:<hash>`
///
/// Expiry is delegated to Redis (`SET ... PX`), and the insertion sequence
/// comes from an `INCR` counter kept outside the record keyspace.
#[derive(Clone)]
pub struct RedisSemanticCacheStore {
    connection: ConnectionManager,
    namespace: String,
}

impl fmt::Debug for RedisSemanticCacheStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisSemanticCacheStore")
            .field("namespace", &self.namespace)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisSemanticCacheStore {
    /// Connect and verify the server answers within `connect_timeout`
    pub async fn connect(
        url: &str,
        namespace: impl Into<String>,
        connect_timeout: Duration,
    ) -> Result<Self, DomainError> {
        let client = Client::open(url)
            .map_err(|e| DomainError::cache(format!("Failed to create Redis client: {}", e)))?;

        let connection = tokio::time::timeout(connect_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| DomainError::cache("Timed out connecting to Redis"))?
            .map_err(|e| DomainError::cache(format!("Failed to connect to Redis: {}", e)))?;

        let store = Self {
            connection,
            namespace: namespace.into(),
        };

        tokio::time::timeout(connect_timeout, store.ping())
            .await
            .map_err(|_| DomainError::cache("Timed out pinging Redis"))??;

        Ok(store)
    }

    fn scan_pattern(&self) -> String {
        scan_pattern(&self.namespace)
    }

    fn sequence_key(&self) -> String {
        sequence_key(&self.namespace)
    }

    async fn scan_keys(&self) -> Result<Vec<String>, DomainError> {
        let mut conn = self.connection.clone();
        let pattern = self.scan_pattern();
        let mut cursor = 0u64;
        let mut all_keys = Vec::new();

        loop {
            let (new_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_COUNT)
                .query_async(&mut conn)
                .await
                .map_err(|e| {
                    DomainError::cache(format!("Failed to scan keys '{}': {}", pattern, e))
                })?;

            all_keys.extend(keys);
            cursor = new_cursor;

            if cursor == 0 {
                break;
            }
        }

        all_keys.sort();
        all_keys.dedup();

        Ok(all_keys)
    }
}

fn scan_pattern(namespace: &str) -> String {
    format!("{}:*", namespace)
}

/// Counter key; no `:` after the namespace so record scans never match it
fn sequence_key(namespace: &str) -> String {
    format!("{}__sequence", namespace)
}

fn decode(key: &str, raw: &str) -> Option<CacheRecord> {
    match serde_json::from_str::<CacheRecord>(raw) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!(key = %key, error = %e, "Skipping undecodable cache record");
            None
        }
    }
}

#[async_trait]
impl SemanticCacheStore for RedisSemanticCacheStore {
    fn backend_name(&self) -> &'static str {
        "redis"
    }

    async fn put(&self, record: CacheRecord) -> Result<(), DomainError> {
        let ttl_ms = u64::try_from(record.ttl_for_write()?.as_millis()).unwrap_or(u64::MAX);

        let mut conn = self.connection.clone();

        let sequence: u64 = conn
            .incr(self.sequence_key(), 1u64)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to allocate sequence: {}", e)))?;

        let record = record.with_sequence(sequence);
        let payload = serde_json::to_string(&record)
            .map_err(|e| DomainError::internal(format!("Failed to encode cache record: {}", e)))?;

        let _: () = redis::cmd("SET")
            .arg(record.id())
            .arg(payload)
            .arg("PX")
            .arg(ttl_ms)
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                DomainError::cache(format!("Failed to set key '{}': {}", record.id(), e))
            })?;

        Ok(())
    }

    async fn live_records(&self) -> Result<Vec<CacheRecord>, DomainError> {
        let keys = self.scan_keys().await?;
        let mut conn = self.connection.clone();
        let now = now_millis();
        let mut records = Vec::with_capacity(keys.len());

        for batch in keys.chunks(MGET_BATCH) {
            let values: Vec<Option<String>> = redis::cmd("MGET")
                .arg(batch)
                .query_async(&mut conn)
                .await
                .map_err(|e| DomainError::cache(format!("Failed to read cache records: {}", e)))?;

            records.extend(
                batch
                    .iter()
                    .zip(values)
                    .filter_map(|(key, raw)| raw.and_then(|raw| decode(key, &raw)))
                    .filter(|r| !r.is_expired_at(now)),
            );
        }

        records.sort_by_key(CacheRecord::sequence);

        Ok(records)
    }

    async fn get(&self, id: &str) -> Result<Option<CacheRecord>, DomainError> {
        let mut conn = self.connection.clone();

        let raw: Option<String> = conn
            .get(id)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to get key '{}': {}", id, e)))?;

        Ok(raw
            .and_then(|raw| decode(id, &raw))
            .filter(|r| !r.is_expired()))
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let mut conn = self.connection.clone();

        let deleted: i32 = conn
            .del(id)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to delete key '{}': {}", id, e)))?;

        Ok(deleted > 0)
    }

    async fn clear(&self) -> Result<usize, DomainError> {
        let keys = self.scan_keys().await?;

        if keys.is_empty() {
            return Ok(0);
        }

        let mut conn = self.connection.clone();
        let mut total_deleted = 0usize;

        for batch in keys.chunks(MGET_BATCH) {
            let deleted: i32 = conn
                .del(batch)
                .await
                .map_err(|e| DomainError::cache(format!("Failed to delete keys: {}", e)))?;
            total_deleted += deleted as usize;
        }

        Ok(total_deleted)
    }

    async fn purge_expired(&self) -> Result<usize, DomainError> {
        // Redis expires keys itself
        Ok(0)
    }

    async fn len(&self) -> Result<usize, DomainError> {
        Ok(self.scan_keys().await?.len())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        let mut conn = self.connection.clone();

        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| DomainError::cache(format!("Redis ping failed: {}", e)))?;

        Ok(())
    }
}
