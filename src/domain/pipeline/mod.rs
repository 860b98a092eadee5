//! Answer pipeline domain types

mod outcome;
mod stage;

pub use outcome::{PipelineOutcome, PipelineRequest, StageLatencies};
pub use stage::Stage;
