use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Embedding unavailable: {message}")]
    Embedding { message: String },

    #[error("Retrieval error: {message}")]
    Retrieval { message: String },

    #[error("Generation error: {message}")]
    Generation { message: String },

    #[error("Timeout: {stage} did not complete within {timeout_ms}ms")]
    Timeout { stage: String, timeout_ms: u64 },

    #[error("Cache error: {message}")]
    Cache { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding {
            message: message.into(),
        }
    }

    pub fn retrieval(message: impl Into<String>) -> Self {
        Self::Retrieval {
            message: message.into(),
        }
    }

    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    pub fn timeout(stage: impl Into<String>, timeout: std::time::Duration) -> Self {
        Self::Timeout {
            stage: stage.into(),
            timeout_ms: timeout.as_millis() as u64,
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the error must be reported to the caller as a failed request
    pub fn is_request_failure(&self) -> bool {
        matches!(
            self,
            DomainError::Retrieval { .. }
                | DomainError::Generation { .. }
                | DomainError::Timeout { .. }
                | DomainError::Provider { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("Question cannot be empty");
        assert_eq!(error.to_string(), "Validation error: Question cannot be empty");
    }

    #[test]
    fn test_timeout_error() {
        let error = DomainError::timeout("retrieve", Duration::from_millis(1500));
        assert_eq!(
            error.to_string(),
            "Timeout: retrieve did not complete within 1500ms"
        );
    }

    #[test]
    fn test_request_failure_classification() {
        assert!(DomainError::retrieval("down").is_request_failure());
        assert!(DomainError::generation("down").is_request_failure());
        assert!(DomainError::timeout("generate", Duration::from_secs(1)).is_request_failure());
        assert!(!DomainError::cache("unreachable").is_request_failure());
        assert!(!DomainError::embedding("rate limited").is_request_failure());
    }
}
