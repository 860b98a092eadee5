//! Request and response bodies of the question endpoint

use serde::{Deserialize, Serialize};

use crate::domain::{PipelineOutcome, PipelineRequest};

/// Body of `POST /ask`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl From<AskRequest> for PipelineRequest {
    fn from(body: AskRequest) -> Self {
        let request = PipelineRequest::new(body.question);

        match body.user_id {
            Some(user_id) => request.with_user_id(user_id),
            None => request,
        }
    }
}

/// Body returned by `POST /ask`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    pub user_id: Option<String>,
    pub cached: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub latency_ms: u64,
}

impl AskResponse {
    pub fn from_outcome(outcome: PipelineOutcome, user_id: Option<String>) -> Self {
        Self {
            answer: outcome.answer,
            user_id,
            cached: outcome.cache_hit,
            request_id: outcome.request_id,
            similarity: outcome.similarity,
            model: outcome.model,
            latency_ms: outcome.latencies.total_ms,
        }
    }
}
