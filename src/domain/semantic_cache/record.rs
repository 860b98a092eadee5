//! Cache record entity

use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::DomainError;

/// Milliseconds since the unix epoch
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Storage key for a question: namespace plus SHA-256 of the literal text.
///
/// Identical text always maps to the same key, a paraphrase never does.
pub fn record_key(namespace: &str, question: &str) -> String {
    let digest = Sha256::digest(question.as_bytes());
    format!("{}:{}", namespace, hex::encode(digest))
}

/// A cached answer together with the embedding of the question it answers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    id: String,
    question: String,
    embedding: Vec<f32>,
    answer: String,
    created_at: u64,
    expires_at: u64,
    /// Insertion order assigned by the store; lower wins similarity ties
    #[serde(default)]
    sequence: u64,
}

impl CacheRecord {
    pub fn new(
        namespace: &str,
        question: impl Into<String>,
        embedding: Vec<f32>,
        answer: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        let question = question.into();
        let now = now_millis();

        Self {
            id: record_key(namespace, &question),
            question,
            embedding,
            answer: answer.into(),
            created_at: now,
            expires_at: now.saturating_add(ttl.as_millis() as u64),
            sequence: 0,
        }
    }

    /// Stamp the insertion order, done by the store on write
    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn embedding(&self) -> &[f32] {
        &self.embedding
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    pub fn expires_at(&self) -> u64 {
        self.expires_at
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Remaining lifetime, `None` once expired
    pub fn remaining_ttl(&self) -> Option<Duration> {
        let now = now_millis();
        (now < self.expires_at).then(|| Duration::from_millis(self.expires_at - now))
    }

    /// Lifetime left for a store write; an expired record is refused
    pub fn ttl_for_write(&self) -> Result<Duration, DomainError> {
        self.remaining_ttl().ok_or_else(|| {
            DomainError::cache(format!("Record '{}' expired before it was stored", self.id))
        })
    }

    pub fn is_expired_at(&self, now_millis: u64) -> bool {
        now_millis >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(now_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_key_is_content_hash() {
        let a = record_key("genai:semantic_cache", "What is Agentic AI?");
        let b = record_key("genai:semantic_cache", "What is Agentic AI?");
        let c = record_key("genai:semantic_cache", "Explain Agentic AI");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("genai:semantic_cache:"));
        assert_eq!(a.len(), "genai:semantic_cache:".len() + 64);
    }

    #[test]
    fn test_record_creation() {
        let record = CacheRecord::new(
            "ns",
            "What is Agentic AI?",
            vec![0.1, 0.2],
            "Agentic AI acts autonomously.",
            Duration::from_secs(60),
        );

        assert_eq!(record.id(), record_key("ns", "What is Agentic AI?"));
        assert_eq!(record.question(), "What is Agentic AI?");
        assert_eq!(record.embedding(), &[0.1, 0.2]);
        assert_eq!(record.answer(), "Agentic AI acts autonomously.");
        assert_eq!(record.expires_at() - record.created_at(), 60_000);
        assert_eq!(record.sequence(), 0);
        assert!(!record.is_expired());
        assert!(record.remaining_ttl().is_some());
    }

    #[test]
    fn test_record_expiry_boundary() {
        let record = CacheRecord::new("ns", "q", vec![1.0], "a", Duration::from_secs(1));

        assert!(!record.is_expired_at(record.expires_at() - 1));
        assert!(record.is_expired_at(record.expires_at()));
    }

    #[test]
    fn test_zero_ttl_is_immediately_expired() {
        let record = CacheRecord::new("ns", "q", vec![1.0], "a", Duration::ZERO);

        assert!(record.is_expired());
        assert!(record.remaining_ttl().is_none());
        assert!(matches!(record.ttl_for_write(), Err(DomainError::Cache { .. })));
    }

    #[test]
    fn test_record_serialization_roundtrip_keeps_sequence() {
        let record =
            CacheRecord::new("ns", "q", vec![1.0, 0.0], "a", Duration::from_secs(5)).with_sequence(7);

        let json = serde_json::to_string(&record).unwrap();
        let decoded: CacheRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded, record);
    }
}
