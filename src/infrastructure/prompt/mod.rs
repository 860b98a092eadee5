//! Prompt routing implementations

mod template_router;

pub use template_router::{TemplatePromptRouter, DEFAULT_PROMPT_TEMPLATE};
