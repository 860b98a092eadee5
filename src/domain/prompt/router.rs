//! Prompt routing trait

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// The model to call and the fully assembled prompt to send it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutedPrompt {
    pub model: String,
    pub prompt: String,
}

impl RoutedPrompt {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
        }
    }
}

/// Chooses a model and builds the prompt for a question and its context
pub trait PromptRouter: Send + Sync + Debug {
    fn build(&self, question: &str, context: &str) -> Result<RoutedPrompt, DomainError>;
}
