//! Semantic cache configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Backing store for cache records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackend {
    /// Process-local map, lost on restart
    #[default]
    InMemory,
    /// Shared Redis instance
    Redis,
    /// Every lookup misses, every insert is discarded
    Disabled,
}

impl std::fmt::Display for CacheBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheBackend::InMemory => write!(f, "in_memory"),
            CacheBackend::Redis => write!(f, "redis"),
            CacheBackend::Disabled => write!(f, "disabled"),
        }
    }
}

impl std::str::FromStr for CacheBackend {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "in_memory" | "inmemory" | "memory" => Ok(CacheBackend::InMemory),
            "redis" => Ok(CacheBackend::Redis),
            "disabled" | "none" | "noop" => Ok(CacheBackend::Disabled),
            _ => Err(DomainError::configuration(format!(
                "Unknown cache backend: {}. Valid backends: in_memory, redis, disabled",
                s
            ))),
        }
    }
}

/// Configuration for semantic caching
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticCacheConfig {
    /// Whether semantic caching is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default)]
    pub backend: CacheBackend,

    /// Redis connection URL, required for the redis backend
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Minimum cosine similarity for a cache hit (0.0 to 1.0)
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Time-to-live for cached answers in seconds
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Capacity of the in-memory backend
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Key prefix for cache records
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Interval of the background purge of expired records; 0 disables it
    #[serde(default = "default_purge_interval_secs")]
    pub purge_interval_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_similarity_threshold() -> f32 {
    0.90
}

fn default_ttl_secs() -> u64 {
    1800
}

fn default_max_entries() -> usize {
    10_000
}

fn default_namespace() -> String {
    "genai:semantic_cache".to_string()
}

fn default_purge_interval_secs() -> u64 {
    60
}

impl Default for SemanticCacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            backend: CacheBackend::default(),
            redis_url: None,
            similarity_threshold: default_similarity_threshold(),
            ttl_secs: default_ttl_secs(),
            max_entries: default_max_entries(),
            namespace: default_namespace(),
            purge_interval_secs: default_purge_interval_secs(),
        }
    }
}

impl SemanticCacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn purge_interval(&self) -> Option<Duration> {
        (self.purge_interval_secs > 0).then(|| Duration::from_secs(self.purge_interval_secs))
    }

    /// Backend actually in use once `enabled` is taken into account
    pub fn effective_backend(&self) -> CacheBackend {
        if self.enabled {
            self.backend
        } else {
            CacheBackend::Disabled
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_backend(mut self, backend: CacheBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_redis_url(mut self, url: impl Into<String>) -> Self {
        self.redis_url = Some(url.into());
        self
    }

    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl_secs = ttl.as_secs();
        self
    }

    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Reject values outside their documented ranges
    pub fn validate(&self) -> Result<(), DomainError> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(DomainError::configuration(format!(
                "cache.similarity_threshold must be within [0, 1], got {}",
                self.similarity_threshold
            )));
        }

        if self.ttl_secs == 0 {
            return Err(DomainError::configuration(
                "cache.ttl_secs must be greater than 0",
            ));
        }

        if self.max_entries == 0 {
            return Err(DomainError::configuration(
                "cache.max_entries must be greater than 0",
            ));
        }

        if self.effective_backend() == CacheBackend::Redis && self.redis_url.is_none() {
            return Err(DomainError::configuration(
                "cache.redis_url is required for the redis backend",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SemanticCacheConfig::default();

        assert!(config.enabled);
        assert_eq!(config.backend, CacheBackend::InMemory);
        assert!((config.similarity_threshold - 0.90).abs() < f32::EPSILON);
        assert_eq!(config.ttl(), Duration::from_secs(1800));
        assert_eq!(config.max_entries, 10_000);
        assert_eq!(config.namespace, "genai:semantic_cache");
        assert_eq!(config.purge_interval(), Some(Duration::from_secs(60)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = SemanticCacheConfig::new()
            .with_backend(CacheBackend::Redis)
            .with_redis_url("redis://localhost:6379/0")
            .with_similarity_threshold(0.95)
            .with_ttl(Duration::from_secs(60))
            .with_max_entries(50)
            .with_namespace("test:cache");

        assert_eq!(config.effective_backend(), CacheBackend::Redis);
        assert_eq!(config.redis_url.as_deref(), Some("redis://localhost:6379/0"));
        assert!((config.similarity_threshold - 0.95).abs() < f32::EPSILON);
        assert_eq!(config.ttl_secs, 60);
        assert_eq!(config.max_entries, 50);
        assert_eq!(config.namespace, "test:cache");
    }

    #[test]
    fn test_similarity_threshold_clamped() {
        let config = SemanticCacheConfig::new().with_similarity_threshold(1.5);
        assert_eq!(config.similarity_threshold, 1.0);

        let config = SemanticCacheConfig::new().with_similarity_threshold(-0.5);
        assert_eq!(config.similarity_threshold, 0.0);
    }

    #[test]
    fn test_validate_rejects_out_of_range_values() {
        let mut config = SemanticCacheConfig::default();
        config.similarity_threshold = 1.2;
        assert!(config.validate().is_err());

        let config = SemanticCacheConfig::default().with_ttl(Duration::from_secs(0));
        assert!(config.validate().is_err());

        let config = SemanticCacheConfig::default().with_backend(CacheBackend::Redis);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_disabled_overrides_backend() {
        let config = SemanticCacheConfig::default()
            .with_backend(CacheBackend::Redis)
            .with_enabled(false);

        assert_eq!(config.effective_backend(), CacheBackend::Disabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("memory".parse::<CacheBackend>().unwrap(), CacheBackend::InMemory);
        assert_eq!("REDIS".parse::<CacheBackend>().unwrap(), CacheBackend::Redis);
        assert_eq!("none".parse::<CacheBackend>().unwrap(), CacheBackend::Disabled);
        assert!("memcached".parse::<CacheBackend>().is_err());
        assert_eq!(CacheBackend::Redis.to_string(), "redis");
    }
}
