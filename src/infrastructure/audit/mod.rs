//! Audit sink implementations

mod jsonl;
mod tracing_sink;

pub use jsonl::JsonlAuditSink;
pub use tracing_sink::TracingAuditSink;
