//! Metric reporting seam used by the pipeline

use std::fmt::Debug;

/// Retrieval stage latency in milliseconds
pub const RETRIEVAL_LATENCY_MS: &str = "retrieval_latency_ms";
/// Generation stage latency in milliseconds
pub const LLM_LATENCY_MS: &str = "llm_latency_ms";
/// End-to-end pipeline latency in milliseconds
pub const PIPELINE_LATENCY_MS: &str = "pipeline_latency_ms";
pub const CACHE_HITS_TOTAL: &str = "semantic_cache_hits_total";
pub const CACHE_MISSES_TOTAL: &str = "semantic_cache_misses_total";
pub const PIPELINE_FAILURES_TOTAL: &str = "pipeline_failures_total";

/// Receives named measurements. Implementations must not block.
pub trait MetricSink: Send + Sync + Debug {
    /// Record one observation of a distribution
    fn record(&self, name: &'static str, value: f64);

    /// Increment a counter by one
    fn increment(&self, name: &'static str);
}

/// Sink that drops every measurement
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetricSink;

impl MetricSink for NoopMetricSink {
    fn record(&self, _name: &'static str, _value: f64) {}

    fn increment(&self, _name: &'static str) {}
}

#[cfg(test)]
pub mod mock {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    /// Sink that keeps every measurement for inspection
    #[derive(Debug, Default)]
    pub struct RecordingMetricSink {
        observations: Mutex<Vec<(&'static str, f64)>>,
        counters: Mutex<HashMap<&'static str, u64>>,
    }

    impl RecordingMetricSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn observations(&self, name: &str) -> Vec<f64> {
            self.observations
                .lock()
                .unwrap()
                .iter()
                .filter(|(n, _)| *n == name)
                .map(|(_, v)| *v)
                .collect()
        }

        pub fn counter(&self, name: &str) -> u64 {
            self.counters.lock().unwrap().get(name).copied().unwrap_or(0)
        }
    }

    impl MetricSink for RecordingMetricSink {
        fn record(&self, name: &'static str, value: f64) {
            self.observations.lock().unwrap().push((name, value));
        }

        fn increment(&self, name: &'static str) {
            *self.counters.lock().unwrap().entry(name).or_insert(0) += 1;
        }
    }
}
