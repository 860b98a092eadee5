//! Pipeline request and outcome types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// A question to answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineRequest {
    pub request_id: String,
    pub question: String,
    pub user_id: Option<String>,
}

impl PipelineRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            question: question.into(),
            user_id: None,
        }
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Blank questions are rejected before any stage runs
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.question.trim().is_empty() {
            return Err(DomainError::validation("Question must not be empty"));
        }

        Ok(())
    }
}

/// Wall-clock time spent in each stage, in milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageLatencies {
    pub cache_check_ms: u64,
    pub retrieval_ms: u64,
    pub generation_ms: u64,
    pub cache_write_ms: u64,
    pub total_ms: u64,
}

/// Result of one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutcome {
    pub request_id: String,
    pub answer: String,
    pub cache_hit: bool,
    /// Similarity of the matched record, on a hit
    pub similarity: Option<f32>,
    /// Model that generated the answer, on a miss
    pub model: Option<String>,
    pub latencies: StageLatencies,
}
