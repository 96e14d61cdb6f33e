use crate::{Check, REGEX_MISMATCH};
use regex::Regex;
use tally_core::model::{AutoChecks, PromptSpec};

pub struct RegexCheck;

impl Check for RegexCheck {
    fn name(&self) -> &'static str {
        "regex"
    }

    fn apply(&self, prompt: &PromptSpec, text: &str, out: &mut AutoChecks) {
        let Some(pattern) = prompt.checks.as_ref().and_then(|c| c.regex.as_deref()) else {
            return;
        };
        // Catalog loading rejects bad patterns; this only guards hand-built specs.
        let re = match Regex::new(pattern) {
            Ok(re) => re,
            Err(e) => {
                tracing::warn!(
                    event = "checks.regex_invalid",
                    prompt_id = %prompt.id,
                    pattern = %pattern,
                    error = %e
                );
                return;
            }
        };
        if !re.is_match(text) {
            out.flags.push(REGEX_MISMATCH.into());
        }
    }
}
