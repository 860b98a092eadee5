//! Default post-processing and guardrail implementations

mod pii;
mod secure_output;

pub use pii::RegexGuardrail;
pub use secure_output::SecureOutputProcessor;
