//! Embedding response

use crate::domain::DomainError;

/// One vector per requested text, in request order
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingResponse {
    model: String,
    vectors: Vec<Vec<f32>>,
}

impl EmbeddingResponse {
    pub fn new(model: impl Into<String>, vectors: Vec<Vec<f32>>) -> Self {
        Self {
            model: model.into(),
            vectors,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn vectors(&self) -> &[Vec<f32>] {
        &self.vectors
    }

    /// The vector answering a question request
    pub fn into_single(self) -> Result<Vec<f32>, DomainError> {
        let mut vectors = self.into_exactly(1)?;
        Ok(vectors.remove(0))
    }

    /// All vectors, failing unless there are exactly `expected`
    pub fn into_exactly(self, expected: usize) -> Result<Vec<Vec<f32>>, DomainError> {
        if self.vectors.len() != expected {
            return Err(DomainError::embedding(format!(
                "Expected {} embeddings, got {}",
                expected,
                self.vectors.len()
            )));
        }

        Ok(self.vectors)
    }
}
