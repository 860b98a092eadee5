//! Context retriever trait

use async_trait::async_trait;

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Produces the context passage a prompt is built from
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ContextRetriever: Send + Sync {
    /// Retrieve context relevant to `question`.
    ///
    /// An empty string is a valid result when nothing relevant is indexed.
    async fn retrieve(&self, question: &str) -> Result<String, DomainError>;
}
