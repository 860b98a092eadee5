//! Pipeline stage machine

use serde::{Deserialize, Serialize};

/// One step of answering a question.
///
/// The order is fixed: a cache hit short-circuits straight to `Done`, a miss
/// walks every remaining stage in sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Start,
    CacheCheck,
    Retrieve,
    BuildPrompt,
    Generate,
    PostProcess,
    Guardrail,
    CacheWrite,
    Done,
}

impl Stage {
    /// The stage after this one. `cache_hit` only matters leaving `CacheCheck`.
    pub fn next(self, cache_hit: bool) -> Stage {
        match self {
            Stage::Start => Stage::CacheCheck,
            Stage::CacheCheck if cache_hit => Stage::Done,
            Stage::CacheCheck => Stage::Retrieve,
            Stage::Retrieve => Stage::BuildPrompt,
            Stage::BuildPrompt => Stage::Generate,
            Stage::Generate => Stage::PostProcess,
            Stage::PostProcess => Stage::Guardrail,
            Stage::Guardrail => Stage::CacheWrite,
            Stage::CacheWrite => Stage::Done,
            Stage::Done => Stage::Done,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Stage::Done
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Start => "start",
            Stage::CacheCheck => "cache_check",
            Stage::Retrieve => "retrieve",
            Stage::BuildPrompt => "build_prompt",
            Stage::Generate => "generate",
            Stage::PostProcess => "post_process",
            Stage::Guardrail => "guardrail",
            Stage::CacheWrite => "cache_write",
            Stage::Done => "done",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(cache_hit: bool) -> Vec<Stage> {
        let mut stages = vec![Stage::Start];
        let mut current = Stage::Start;

        while !current.is_terminal() {
            current = current.next(cache_hit);
            stages.push(current);
        }

        stages
    }

    #[test]
    fn test_hit_path_short_circuits() {
        assert_eq!(
            walk(true),
            vec![Stage::Start, Stage::CacheCheck, Stage::Done]
        );
    }

    #[test]
    fn test_miss_path_visits_every_stage_in_order() {
        assert_eq!(
            walk(false),
            vec![
                Stage::Start,
                Stage::CacheCheck,
                Stage::Retrieve,
                Stage::BuildPrompt,
                Stage::Generate,
                Stage::PostProcess,
                Stage::Guardrail,
                Stage::CacheWrite,
                Stage::Done,
            ]
        );
    }

    #[test]
    fn test_hit_flag_ignored_outside_cache_check() {
        assert_eq!(Stage::Retrieve.next(true), Stage::BuildPrompt);
        assert_eq!(Stage::Guardrail.next(true), Stage::CacheWrite);
        assert_eq!(Stage::Done.next(false), Stage::Done);
    }

    #[test]
    fn test_display() {
        assert_eq!(Stage::CacheWrite.to_string(), "cache_write");
    }
}
