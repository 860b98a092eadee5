//! Semantic answer cache
//!
//! Looks answers up by embedding similarity and writes them back keyed by the
//! literal question. Every failure inside the cache is logged and swallowed:
//! a broken cache costs a regeneration, never a failed request.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::embedding::{EmbeddingProvider, EmbeddingRequest};
use crate::domain::semantic_cache::{
    select_best, CacheHit, CacheRecord, SemanticCacheConfig, SemanticCacheStats,
    SemanticCacheStore,
};
use crate::domain::similarity::is_scorable;
use crate::domain::DomainError;

const DEFAULT_EMBEDDING_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    embedding_failures: AtomicU64,
    writes: AtomicU64,
    dropped_writes: AtomicU64,
}

/// Read-through / write-back cache in front of generation
#[derive(Debug)]
pub struct SemanticCacheService {
    store: Arc<dyn SemanticCacheStore>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    embedding_model: String,
    config: SemanticCacheConfig,
    embedding_timeout: Duration,
    counters: Counters,
}

impl SemanticCacheService {
    pub fn new(
        store: Arc<dyn SemanticCacheStore>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        embedding_model: impl Into<String>,
        config: SemanticCacheConfig,
    ) -> Self {
        Self {
            store,
            embedding_provider,
            embedding_model: embedding_model.into(),
            config,
            embedding_timeout: DEFAULT_EMBEDDING_TIMEOUT,
            counters: Counters::default(),
        }
    }

    pub fn with_embedding_timeout(mut self, timeout: Duration) -> Self {
        self.embedding_timeout = timeout;
        self
    }

    pub fn config(&self) -> &SemanticCacheConfig {
        &self.config
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Threshold from configuration, clamped to [0, 1]
    pub fn similarity_threshold(&self) -> f32 {
        self.config.similarity_threshold.clamp(0.0, 1.0)
    }

    async fn embed_question(&self, question: &str) -> Result<Vec<f32>, DomainError> {
        let request = EmbeddingRequest::question(self.embedding_model.clone(), question);

        let response = tokio::time::timeout(self.embedding_timeout, self.embedding_provider.embed(request))
            .await
            .map_err(|_| DomainError::timeout("embedding", self.embedding_timeout))??;

        response.into_single()
    }

    fn record_miss(&self) -> Option<CacheHit> {
        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Find a cached answer for a question similar to `question`.
    ///
    /// Returns the best live record when its similarity is at least
    /// `threshold` (clamped to [0, 1]). Ties go to the earliest insert.
    pub async fn lookup(&self, question: &str, threshold: f32) -> Option<CacheHit> {
        if !self.config.enabled {
            return None;
        }

        let threshold = threshold.clamp(0.0, 1.0);

        let embedding = match self.embed_question(question).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!(error = %e, "Failed to embed question for cache lookup");
                self.counters.embedding_failures.fetch_add(1, Ordering::Relaxed);
                return self.record_miss();
            }
        };

        let records = match self.store.live_records().await {
            Ok(records) => records,
            Err(e) => {
                warn!(backend = self.store.backend_name(), error = %e, "Cache scan failed");
                return self.record_miss();
            }
        };

        let Some(best) = select_best(&embedding, &records) else {
            debug!(candidates = records.len(), "Semantic cache miss, no scorable records");
            return self.record_miss();
        };

        if best.similarity >= threshold {
            debug!(
                record_id = %best.record.id(),
                similarity = best.similarity,
                threshold,
                "Semantic cache hit"
            );
            self.counters.hits.fetch_add(1, Ordering::Relaxed);
            return Some(CacheHit::from_match(&best));
        }

        debug!(
            best_similarity = best.similarity,
            threshold,
            candidates = records.len(),
            "Semantic cache miss"
        );
        self.record_miss()
    }

    /// Lookup with the configured threshold
    pub async fn lookup_default(&self, question: &str) -> Option<CacheHit> {
        self.lookup(question, self.similarity_threshold()).await
    }

    /// Store `answer` under `question`, replacing any record for the same
    /// literal question. Failures drop the write.
    pub async fn insert(&self, question: &str, answer: &str, ttl: Duration) {
        if !self.config.enabled {
            return;
        }

        let embedding = match self.embed_question(question).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!(error = %e, "Failed to embed question, cache write dropped");
                self.counters.embedding_failures.fetch_add(1, Ordering::Relaxed);
                self.counters.dropped_writes.fetch_add(1, Ordering::Relaxed);
                return;
            }
        };

        if !is_scorable(&embedding) {
            warn!(dimensions = embedding.len(), "Degenerate question embedding, cache write dropped");
            self.counters.dropped_writes.fetch_add(1, Ordering::Relaxed);
            return;
        }

        let record = CacheRecord::new(&self.config.namespace, question, embedding, answer, ttl);
        let record_id = record.id().to_string();

        match self.store.put(record).await {
            Ok(()) => {
                debug!(record_id = %record_id, ttl_secs = ttl.as_secs(), "Answer cached");
                self.counters.writes.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                warn!(backend = self.store.backend_name(), error = %e, "Cache write dropped");
                self.counters.dropped_writes.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Insert with the configured TTL
    pub async fn insert_default(&self, question: &str, answer: &str) {
        self.insert(question, answer, self.config.ttl()).await
    }

    /// Counters since startup plus the current live entry count
    pub async fn stats(&self) -> SemanticCacheStats {
        let entries = match self.store.len().await {
            Ok(len) => len,
            Err(e) => {
                warn!(error = %e, "Failed to count cache entries");
                0
            }
        };

        SemanticCacheStats {
            backend: self.store.backend_name().to_string(),
            entries,
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            embedding_failures: self.counters.embedding_failures.load(Ordering::Relaxed),
            writes: self.counters.writes.load(Ordering::Relaxed),
            dropped_writes: self.counters.dropped_writes.load(Ordering::Relaxed),
        }
    }

    /// Check that the backing store is reachable
    pub async fn ping(&self) -> Result<(), DomainError> {
        self.store.ping().await
    }

    /// Remove every record
    pub async fn invalidate_all(&self) -> Result<usize, DomainError> {
        let removed = self.store.clear().await?;
        info!(removed, backend = self.store.backend_name(), "Semantic cache invalidated");
        Ok(removed)
    }

    /// Physically remove expired records
    pub async fn purge_expired(&self) -> Result<usize, DomainError> {
        self.store.purge_expired().await
    }

    /// Run `purge_expired` every `interval` until the handle is aborted
    pub fn spawn_purge_task(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;

                match self.purge_expired().await {
                    Ok(0) => {}
                    Ok(purged) => debug!(purged, "Expired cache records purged"),
                    Err(e) => warn!(error = %e, "Cache purge failed"),
                }
            }
        })
    }
}
