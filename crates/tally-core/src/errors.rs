use std::path::PathBuf;
use thiserror::Error;

/// Fatal startup problems. Reported once; no ledger is touched.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config not found: {} (run `tally init` to write a sample)", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML: {0}")]
    Parse(String),

    #[error("unknown fields detected in strict mode: {keys:?} (file: {})", path.display())]
    UnknownFields { keys: Vec<String>, path: PathBuf },

    #[error("model '{name}' not in config{}; available: {}", hint_suffix(.hint), .available.join(", "))]
    UnknownModel {
        name: String,
        available: Vec<String>,
        hint: Option<String>,
    },

    #[error("judge model '{name}' not in config{}", hint_suffix(.hint))]
    UnknownJudgeModel { name: String, hint: Option<String> },

    #[error("judge model '{0}' is the same as the evaluated model")]
    JudgeIsEvalModel(String),

    #[error("could not initialise provider for '{model}': {message}")]
    Provider { model: String, message: String },

    #[error("failed to write sample config {}: {source}", path.display())]
    WriteSample {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn hint_suffix(hint: &Option<String>) -> String {
    match hint {
        Some(h) => format!(" (did you mean '{}'?)", h),
        None => String::new(),
    }
}

/// Closest candidate by edit distance, if it is close enough to be a plausible typo.
pub fn closest_match<'a, I>(needle: &str, candidates: I) -> Option<String>
where
    I: IntoIterator<Item = &'a String>,
{
    candidates
        .into_iter()
        .map(|c| (strsim::levenshtein(needle, c), c))
        .filter(|(d, c)| *d <= (c.len().max(needle.len()) / 3).max(2))
        .min_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)))
        .map(|(_, c)| c.clone())
}
