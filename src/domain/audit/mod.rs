//! Audit trail of answered questions

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// One generated answer and everything that went into it.
///
/// Emitted once per cache miss that completes successfully; cache hits
/// produce no audit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub request_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub question: String,
    pub prompt: String,
    /// Answer after post-processing, before guardrails
    pub post_processed: String,
    /// Answer returned to the caller
    pub final_answer: String,
    pub model: String,
    /// Retrieval plus generation latency
    pub latency_ms: u64,
    pub retrieved_context: String,
    pub timestamp: DateTime<Utc>,
}

/// Destination for audit records
#[async_trait]
pub trait AuditSink: Send + Sync + Debug {
    async fn record(&self, record: AuditRecord) -> Result<(), DomainError>;
}

/// Sink that discards every record
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAuditSink;

#[async_trait]
impl AuditSink for NoopAuditSink {
    async fn record(&self, _record: AuditRecord) -> Result<(), DomainError> {
        Ok(())
    }
}
