//! Settings for span export and the Prometheus endpoint

use serde::Deserialize;

use crate::domain::DomainError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default)]
    pub tracing: TracingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl ObservabilityConfig {
    pub fn validate(&self) -> Result<(), DomainError> {
        self.tracing.validate()?;
        self.metrics.validate()
    }
}

/// OTLP span export; logs go to stdout regardless
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    pub enabled: bool,
    /// gRPC collector endpoint
    pub otlp_endpoint: String,
    pub service_name: String,
    /// Fraction of root spans exported
    pub sampling_ratio: f64,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            otlp_endpoint: "http://localhost:4317".to_string(),
            service_name: env!("CARGO_PKG_NAME").to_string(),
            sampling_ratio: 1.0,
        }
    }
}

impl TracingConfig {
    fn validate(&self) -> Result<(), DomainError> {
        if !(0.0..=1.0).contains(&self.sampling_ratio) {
            return Err(DomainError::configuration(format!(
                "observability.tracing.sampling_ratio must be within [0, 1], got {}",
                self.sampling_ratio
            )));
        }

        if self.enabled && self.otlp_endpoint.trim().is_empty() {
            return Err(DomainError::configuration(
                "observability.tracing.otlp_endpoint is required when tracing is enabled",
            ));
        }

        Ok(())
    }
}

/// Prometheus recorder and the route serving it
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl MetricsConfig {
    fn validate(&self) -> Result<(), DomainError> {
        const RESERVED: &[&str] = &["/", "/ask", "/health", "/live", "/ready", "/cache"];

        if !self.path.starts_with('/') {
            return Err(DomainError::configuration(format!(
                "observability.metrics.path must start with '/', got {}",
                self.path
            )));
        }

        if self.enabled && RESERVED.contains(&self.path.as_str()) {
            return Err(DomainError::configuration(format!(
                "observability.metrics.path {} collides with an API route",
                self.path
            )));
        }

        Ok(())
    }
}
