//! Deterministic auto-checks run on every successful response before it is
//! judged. Nothing here calls a model.

use std::sync::Arc;

use serde_json::json;
use tally_core::checks::AutoChecker;
use tally_core::model::{AutoChecks, PromptSpec};

mod length;
mod refusal;
mod regex_match;
mod terms;

pub const EMPTY_RESPONSE: &str = "EMPTY_RESPONSE";
pub const REFUSAL: &str = "REFUSAL";
pub const REGEX_MISMATCH: &str = "REGEX_MISMATCH";
pub const TOO_LONG: &str = "TOO_LONG";
pub const MISSING_PREFIX: &str = "MISSING:";
pub const FORBIDDEN_PREFIX: &str = "FORBIDDEN:";

/// A single heuristic. Implementations only append to `out`.
pub trait Check: Send + Sync {
    fn name(&self) -> &'static str;
    fn apply(&self, prompt: &PromptSpec, text: &str, out: &mut AutoChecks);
}

pub struct DefaultChecker {
    checks: Vec<Box<dyn Check>>,
}

impl Default for DefaultChecker {
    fn default() -> Self {
        Self {
            checks: vec![
                Box::new(refusal::RefusalCheck),
                Box::new(terms::MustContainCheck),
                Box::new(terms::MustNotContainCheck),
                Box::new(regex_match::RegexCheck),
                Box::new(length::MaxWordsCheck),
            ],
        }
    }
}

impl AutoChecker for DefaultChecker {
    fn check(&self, prompt: &PromptSpec, response: &str) -> AutoChecks {
        let mut out = AutoChecks::default();
        out.auto_scores
            .insert("word_count".into(), json!(word_count(response)));

        if response.trim().is_empty() {
            out.flags.push(EMPTY_RESPONSE.into());
        } else {
            for c in &self.checks {
                let before = out.flags.len();
                c.apply(prompt, response, &mut out);
                if out.flags.len() > before {
                    tracing::trace!(check = c.name(), prompt_id = %prompt.id, "check raised flags");
                }
            }
        }

        out.passed = out.flags.is_empty();
        if !out.passed {
            tracing::debug!(event = "checks.flagged", prompt_id = %prompt.id, flags = ?out.flags);
        }
        out
    }
}

pub fn default_checker() -> Arc<dyn AutoChecker> {
    Arc::new(DefaultChecker::default())
}

pub(crate) fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}


#[cfg(test)]
mod tests {
    use super::test_util::prompt;
    use super::*;
    use tally_core::model::CheckSpec;

    #[test]
    fn clean_response_passes() {
        let out = DefaultChecker::default().check(&prompt(None), "fn add(a: i32) -> i32 { a }");
        assert!(out.passed);
        assert!(out.flags.is_empty());
        assert_eq!(out.auto_scores["word_count"], json!(8));
    }

    #[test]
    fn whitespace_only_is_empty_and_skips_other_checks() {
        let spec = CheckSpec {
            must_contain: vec!["fn".into()],
            ..Default::default()
        };
        let out = DefaultChecker::default().check(&prompt(Some(spec)), " \n\t ");
        assert_eq!(out.flags, vec![EMPTY_RESPONSE]);
        assert!(!out.passed);
        assert_eq!(out.auto_scores["word_count"], json!(0));
    }

    #[test]
    fn flags_accumulate_in_check_order() {
        let spec = CheckSpec {
            must_contain: vec!["unsafe".into()],
            must_not_contain: vec!["TODO".into()],
            regex: Some(r"^fn ".into()),
            max_words: Some(3),
        };
        let out = DefaultChecker::default().check(
            &prompt(Some(spec)),
            "I'm sorry, but I can't write that. TODO later",
        );
        assert_eq!(
            out.flags,
            vec![
                "REFUSAL",
                "MISSING:unsafe",
                "FORBIDDEN:TODO",
                "REGEX_MISMATCH",
                "TOO_LONG"
            ]
        );
        assert!(!out.passed);
        assert_eq!(out.auto_scores["must_contain_hits"], json!(0));
    }
}
