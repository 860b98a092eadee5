use std::collections::HashMap;

use tracing::debug;

use crate::config::LlmConfig;
use crate::domain::{DomainError, PromptRouter, PromptTemplate, RoutedPrompt};

/// Answer-from-context prompt used unless another template is supplied
pub const DEFAULT_PROMPT_TEMPLATE: &str = "You are a helpful assistant. Answer the question using only the context below. \
If the context does not contain the answer, say that you don't know.\n\n\
Context:\n${var:context}\n\n\
Question: ${var:question}\n\n\
Answer:";

/// Router that renders a fixed template and switches to a long-context model
/// once the retrieved context grows past a size threshold
#[derive(Debug, Clone)]
pub struct TemplatePromptRouter {
    template: PromptTemplate,
    default_model: String,
    long_context_model: Option<String>,
    long_context_threshold_chars: usize,
}

impl TemplatePromptRouter {
    pub fn new(default_model: impl Into<String>) -> Self {
        Self {
            template: PromptTemplate::parse(DEFAULT_PROMPT_TEMPLATE),
            default_model: default_model.into(),
            long_context_model: None,
            long_context_threshold_chars: usize::MAX,
        }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        let router = Self::new(config.default_model.clone());

        match &config.long_context_model {
            Some(model) => router.with_long_context_model(model.clone(), config.long_context_threshold_chars),
            None => router,
        }
    }

    pub fn with_long_context_model(mut self, model: impl Into<String>, threshold_chars: usize) -> Self {
        self.long_context_model = Some(model.into());
        self.long_context_threshold_chars = threshold_chars;
        self
    }

    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    fn select_model(&self, context: &str) -> &str {
        match &self.long_context_model {
            Some(model) if context.chars().count() > self.long_context_threshold_chars => model,
            _ => &self.default_model,
        }
    }
}

impl PromptRouter for TemplatePromptRouter {
    fn build(&self, question: &str, context: &str) -> Result<RoutedPrompt, DomainError> {
        let values = HashMap::from([("question", question), ("context", context)]);

        let prompt = self
            .template
            .render(&values)
            .map_err(|e| DomainError::internal(format!("Failed to render prompt: {}", e)))?;
        let model = self.select_model(context);

        debug!(model = %model, prompt_chars = prompt.len(), "Prompt built");

        Ok(RoutedPrompt::new(model, prompt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_question_and_context() {
        let router = TemplatePromptRouter::new("gpt-4.1-nano");

        let routed = router
            .build("What is Agentic AI?", "Agentic AI systems act autonomously.")
            .unwrap();

        assert_eq!(routed.model, "gpt-4.1-nano");
        assert!(routed.prompt.contains("Context:\nAgentic AI systems act autonomously."));
        assert!(routed.prompt.contains("Question: What is Agentic AI?"));
        assert!(!routed.prompt.contains("${var:"));
    }

    #[test]
    fn test_long_context_switches_model() {
        let router = TemplatePromptRouter::new("small").with_long_context_model("large", 10);

        assert_eq!(router.build("q", "short").unwrap().model, "small");
        assert_eq!(router.build("q", "a much longer context").unwrap().model, "large");
    }

    #[test]
    fn test_from_config() {
        let config = LlmConfig {
            long_context_model: Some("gpt-4.1".to_string()),
            long_context_threshold_chars: 5,
            ..LlmConfig::default()
        };
        let router = TemplatePromptRouter::from_config(&config);

        assert_eq!(router.build("q", "abc").unwrap().model, "gpt-4.1-nano");
        assert_eq!(router.build("q", "abcdefgh").unwrap().model, "gpt-4.1");
    }

    #[test]
    fn test_placeholders_in_values_are_not_expanded() {
        let router = TemplatePromptRouter::new("m");

        let routed = router.build("Explain ${var:context}", "ctx").unwrap();

        assert!(routed.prompt.contains("Question: Explain ${var:context}"));
    }

    #[test]
    fn test_custom_template_missing_variable_fails() {
        let router = TemplatePromptRouter::new("m")
            .with_template(PromptTemplate::parse("${var:question} ${var:audience}"));

        assert!(router.build("q", "c").is_err());
    }
}
