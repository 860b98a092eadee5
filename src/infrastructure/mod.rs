//! Infrastructure layer - External service implementations

pub mod audit;
pub mod embedding;
pub mod guardrails;
pub mod llm;
pub mod observability;
pub mod prompt;
pub mod retrieval;
pub mod semantic_cache;
pub mod services;
