use crate::{word_count, Check, TOO_LONG};
use tally_core::model::{AutoChecks, PromptSpec};

pub struct MaxWordsCheck;

impl Check for MaxWordsCheck {
    fn name(&self) -> &'static str {
        "max_words"
    }

    fn apply(&self, prompt: &PromptSpec, text: &str, out: &mut AutoChecks) {
        let Some(max) = prompt.checks.as_ref().and_then(|c| c.max_words) else {
            return;
        };
        if word_count(text) > max {
            out.flags.push(TOO_LONG.into());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::prompt;
    use tally_core::model::CheckSpec;

    #[test]
    fn limit_is_inclusive() {
        let p = prompt(Some(CheckSpec {
            max_words: Some(3),
            ..Default::default()
        }));
        let mut out = AutoChecks::default();
        MaxWordsCheck.apply(&p, "one two three", &mut out);
        assert!(out.flags.is_empty());
        MaxWordsCheck.apply(&p, "one two three four", &mut out);
        assert_eq!(out.flags, vec!["TOO_LONG"]);
    }
}
