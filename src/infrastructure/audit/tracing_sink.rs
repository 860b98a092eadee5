use async_trait::async_trait;
use tracing::info;

use crate::domain::{AuditRecord, AuditSink, DomainError};

/// Writes audit records as structured events on the `audit` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl TracingAuditSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, record: AuditRecord) -> Result<(), DomainError> {
        info!(
            target: "audit",
            request_id = %record.request_id,
            user_id = record.user_id.as_deref().unwrap_or("anonymous"),
            model = %record.model,
            latency_ms = record.latency_ms,
            question = %record.question,
            prompt = %record.prompt,
            post_processed = %record.post_processed,
            final_answer = %record.final_answer,
            retrieved_context = %record.retrieved_context,
            timestamp = %record.timestamp.to_rfc3339(),
            "Answer generated"
        );

        Ok(())
    }
}
