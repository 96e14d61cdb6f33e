use crate::model::{AutoChecks, PromptSpec};

/// Deterministic, model-free heuristics run on every successful response.
pub trait AutoChecker: Send + Sync {
    fn check(&self, prompt: &PromptSpec, response: &str) -> AutoChecks;
}

/// Checker that flags nothing. Useful when heuristics are not wanted.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoChecks;

impl AutoChecker for NoChecks {
    fn check(&self, _prompt: &PromptSpec, _response: &str) -> AutoChecks {
        AutoChecks {
            passed: true,
            ..Default::default()
        }
    }
}
