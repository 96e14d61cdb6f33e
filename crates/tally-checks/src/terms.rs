use crate::{Check, FORBIDDEN_PREFIX, MISSING_PREFIX};
use serde_json::json;
use tally_core::model::{AutoChecks, PromptSpec};

// Terms match case-insensitively as plain substrings.
fn contains_term(haystack_lower: &str, term: &str) -> bool {
    haystack_lower.contains(&term.to_lowercase())
}

pub struct MustContainCheck;

impl Check for MustContainCheck {
    fn name(&self) -> &'static str {
        "must_contain"
    }

    fn apply(&self, prompt: &PromptSpec, text: &str, out: &mut AutoChecks) {
        let Some(spec) = prompt.checks.as_ref().filter(|c| !c.must_contain.is_empty()) else {
            return;
        };
        let lower = text.to_lowercase();
        let mut hits = 0;
        for term in &spec.must_contain {
            if contains_term(&lower, term) {
                hits += 1;
            } else {
                out.flags.push(format!("{}{}", MISSING_PREFIX, term));
            }
        }
        out.auto_scores.insert("must_contain_hits".into(), json!(hits));
    }
}

pub struct MustNotContainCheck;

impl Check for MustNotContainCheck {
    fn name(&self) -> &'static str {
        "must_not_contain"
    }

    fn apply(&self, prompt: &PromptSpec, text: &str, out: &mut AutoChecks) {
        let Some(spec) = &prompt.checks else {
            return;
        };
        let lower = text.to_lowercase();
        for term in &spec.must_not_contain {
            if contains_term(&lower, term) {
                out.flags.push(format!("{}{}", FORBIDDEN_PREFIX, term));
            }
        }
    }
}
