//! Embedding request

use crate::domain::DomainError;

/// Texts to embed with one model. Providers answer in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddingRequest {
    model: String,
    texts: Vec<String>,
}

impl EmbeddingRequest {
    /// Embed one question, for a cache lookup, cache write or vector search
    pub fn question(model: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            texts: vec![question.into()],
        }
    }

    /// Embed a batch of document chunks for indexing
    pub fn chunks(model: impl Into<String>, chunks: Vec<String>) -> Self {
        Self {
            model: model.into(),
            texts: chunks,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Reject requests with no input or a blank text
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.texts.is_empty() {
            return Err(DomainError::validation("Embedding request has no input"));
        }

        match self.texts.iter().position(|t| t.trim().is_empty()) {
            Some(i) => Err(DomainError::validation(format!(
                "Embedding input {} is blank",
                i
            ))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_request_holds_one_text() {
        let request = EmbeddingRequest::question("text-embedding-3-small", "What is Agentic AI?");

        assert_eq!(request.model(), "text-embedding-3-small");
        assert_eq!(request.texts(), ["What is Agentic AI?"]);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_blank_inputs_rejected() {
        assert!(EmbeddingRequest::question("m", "   ").validate().is_err());
        assert!(EmbeddingRequest::chunks("m", vec![]).validate().is_err());

        let err = EmbeddingRequest::chunks("m", vec!["chunk".into(), "\n".into()])
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("input 1"));
    }
}
