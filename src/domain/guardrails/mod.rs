//! Answer sanitization applied after generation
//!
//! Post-processing runs first and guardrails second; both are pure text
//! transforms and never fail.

use std::fmt::Debug;

/// Cleans up raw model output, e.g. stripping leaked credentials
pub trait PostProcessor: Send + Sync + Debug {
    fn process(&self, answer: &str) -> String;
}

/// Masks content that must not reach the caller
pub trait GuardrailFilter: Send + Sync + Debug {
    fn apply(&self, answer: &str) -> String;
}


#[cfg(test)]
mod tests {
    use super::mock::{PassthroughGuardrail, PassthroughPostProcessor};
    use super::*;

    #[test]
    fn test_passthrough_is_identity() {
        assert_eq!(PassthroughPostProcessor.process("  a  "), "  a  ");
        assert_eq!(PassthroughGuardrail.apply("b"), "b");
    }
}
