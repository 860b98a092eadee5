//! Prompt construction - templates and model routing

mod router;
mod template;

pub use router::{PromptRouter, RoutedPrompt};
pub use template::{PromptTemplate, PromptVariable, TemplateError};
