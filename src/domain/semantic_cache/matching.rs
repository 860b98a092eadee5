//! Best-match selection over cache records

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::CacheRecord;
use crate::domain::similarity::cosine_similarity;

/// Highest-scoring record of a scan, regardless of threshold
#[derive(Debug, Clone)]
pub struct BestMatch<'a> {
    pub record: &'a CacheRecord,
    pub similarity: f32,
}

/// Pick the record most similar to `query`.
///
/// Records are visited in the order given (callers pass ascending sequence);
/// a later record replaces the current best only with a strictly greater
/// score, so the first-inserted record wins ties. Records that cannot be
/// scored are skipped.
pub fn select_best<'a>(query: &[f32], records: &'a [CacheRecord]) -> Option<BestMatch<'a>> {
    let mut best: Option<BestMatch<'a>> = None;

    for record in records {
        let similarity = match cosine_similarity(query, record.embedding()) {
            Ok(s) => s,
            Err(e) => {
                debug!(record_id = %record.id(), error = %e, "Skipping unscorable cache record");
                continue;
            }
        };

        match best {
            Some(ref current) if similarity <= current.similarity => {}
            _ => best = Some(BestMatch { record, similarity }),
        }
    }

    best
}

/// A lookup that cleared the similarity threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheHit {
    pub answer: String,
    pub similarity: f32,
    pub record_id: String,
    pub matched_question: String,
}

impl CacheHit {
    pub fn from_match(best: &BestMatch<'_>) -> Self {
        Self {
            answer: best.record.answer().to_string(),
            similarity: best.similarity,
            record_id: best.record.id().to_string(),
            matched_question: best.record.question().to_string(),
        }
    }
}

/// Counters kept by the semantic cache service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SemanticCacheStats {
    pub backend: String,
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub embedding_failures: u64,
    pub writes: u64,
    pub dropped_writes: u64,
}

impl SemanticCacheStats {
    pub fn hit_rate(&self) -> f32 {
        let total = self.hits + self.misses;

        if total == 0 {
            return 0.0;
        }

        self.hits as f32 / total as f32
    }
}
