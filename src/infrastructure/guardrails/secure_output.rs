//! Secret redaction for generated answers

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::guardrails::PostProcessor;

static SECRET_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (
            r"-----BEGIN [A-Z ]*PRIVATE KEY-----(?s:.*?)(?:-----END [A-Z ]*PRIVATE KEY-----|\z)",
            "PRIVATE_KEY",
        ),
        (r"\bsk-(?:proj-)?[A-Za-z0-9_-]{20,}", "API_KEY"),
        (r"\bAKIA[0-9A-Z]{16}\b", "AWS_ACCESS_KEY"),
        (r"\bgh[pousr]_[A-Za-z0-9_]{36,}", "GITHUB_TOKEN"),
        (r"(?i)\bbearer\s+[A-Za-z0-9\-_.=]{20,}", "BEARER_TOKEN"),
        (
            r#"(?i)\b(?:api[_-]?key|secret|password|passwd|pwd)\s*[:=]\s*["']?[^\s"']{8,}["']?"#,
            "CREDENTIAL",
        ),
    ]
    .into_iter()
    .map(|(pattern, name)| {
        (
            Regex::new(pattern).expect("secret pattern is a valid regex"),
            name,
        )
    })
    .collect()
});

static EXCESS_BLANK_LINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("blank line pattern is a valid regex"));

/// Post-processor that trims the answer and replaces credentials with
/// `[REDACTED:<kind>]` markers
#[derive(Debug, Clone, Copy, Default)]
pub struct SecureOutputProcessor;

impl SecureOutputProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl PostProcessor for SecureOutputProcessor {
    fn process(&self, answer: &str) -> String {
        let mut result = answer.trim().to_string();

        for (pattern, name) in SECRET_PATTERNS.iter() {
            if pattern.is_match(&result) {
                result = pattern
                    .replace_all(&result, format!("[REDACTED:{name}]"))
                    .into_owned();
            }
        }

        EXCESS_BLANK_LINES.replace_all(&result, "\n\n").into_owned()
    }
}
