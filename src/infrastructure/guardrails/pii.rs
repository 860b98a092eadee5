//! Regex guardrails masking personal data and violent language

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::guardrails::GuardrailFilter;

// Order matters: 12-digit ID numbers are masked before the looser phone rule
static GUARDRAIL_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (
            r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}",
            "[REDACTED_EMAIL]",
        ),
        (r"\b\d{4}[\s-]?\d{4}[\s-]?\d{4}\b", "[REDACTED_ID]"),
        (
            r"(?:\+\d{1,3}[\s.-]?)?\b(?:\d{1,3}[\s.-]?)?\d{3}[\s.-]?\d{3}[\s.-]?\d{4,5}\b",
            "[REDACTED_PHONE]",
        ),
        (
            r"(?i)\b(?:kill|murder|attack|shoot|stab|bomb)(?:s|ed|ing|er|ers)?\b",
            "[FILTERED]",
        ),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (
            Regex::new(pattern).expect("guardrail pattern is a valid regex"),
            replacement,
        )
    })
    .collect()
});

/// Guardrail masking e-mail addresses, phone numbers, 12-digit national ID
/// numbers and violent terms
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexGuardrail;

impl RegexGuardrail {
    pub fn new() -> Self {
        Self
    }
}

impl GuardrailFilter for RegexGuardrail {
    fn apply(&self, answer: &str) -> String {
        GUARDRAIL_RULES
            .iter()
            .fold(answer.to_string(), |text, (pattern, replacement)| {
                pattern.replace_all(&text, *replacement).into_owned()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(text: &str) -> String {
        RegexGuardrail::new().apply(text)
    }

    #[test]
    fn test_masks_violent_terms() {
        assert_eq!(apply("I want to kill the enemy"), "I want to [FILTERED] the enemy");
        assert_eq!(apply("I want to attack the enemy"), "I want to [FILTERED] the enemy");
        assert_eq!(apply("Shooting is banned"), "[FILTERED] is banned");
        assert_eq!(apply("The skill set"), "The skill set");
    }

    #[test]
    fn test_masks_phone_number() {
        assert_eq!(
            apply("My phone number is 1234567890"),
            "My phone number is [REDACTED_PHONE]"
        );
        assert_eq!(
            apply("Call +1 555-123-4567 now"),
            "Call [REDACTED_PHONE] now"
        );
    }

    #[test]
    fn test_masks_email() {
        assert_eq!(apply("My email is test@test.com"), "My email is [REDACTED_EMAIL]");
    }

    #[test]
    fn test_masks_id_number_before_phone() {
        let result = apply("My Aadhaar number is 123456789012 and my phone is 98547521002");

        assert_eq!(
            result,
            "My Aadhaar number is [REDACTED_ID] and my phone is [REDACTED_PHONE]"
        );
    }

    #[test]
    fn test_clean_text_unchanged() {
        let text = "Agentic AI systems plan multi-step tasks in 2024.";
        assert_eq!(apply(text), text);
    }
}
