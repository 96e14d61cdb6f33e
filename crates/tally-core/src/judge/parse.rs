use super::JudgeVerdict;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Longest excerpt of the raw judge output quoted in a parse-failure rationale.
pub const EXCERPT_CHARS: usize = 200;

// First opener, shortest span: the lazy group stops at the next closer.
static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[A-Za-z0-9_+.\-]*(.*?)```").unwrap());

/// Extracts `{score, rationale}` from free-form judge output.
///
/// Never fails: anything that cannot be read as a JSON object yields
/// `score: None` and a rationale that quotes the start of `raw`. A score that
/// is not an integer in `1..=5` also yields `score: None`.
pub fn parse_judge_output(raw: &str) -> JudgeVerdict {
    let mut text = raw.trim();

    if let Some(inner) = FENCE.captures(text).and_then(|c| c.get(1)) {
        text = inner.as_str().trim();
    }

    if !text.contains('{') {
        return unparseable(raw);
    }
    if let Some(candidate) = extract_object(text) {
        text = candidate;
    }

    let obj = match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(obj)) => obj,
        _ => return unparseable(raw),
    };

    let rationale = match obj.get("rationale") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    let score_value = obj.get("score").unwrap_or(&Value::Null);
    match valid_score(score_value) {
        Some(score) => JudgeVerdict {
            score: Some(score),
            rationale,
        },
        None => JudgeVerdict {
            score: None,
            rationale: format!("invalid score value: {}", score_value),
        },
    }
}

fn valid_score(v: &Value) -> Option<u8> {
    let n = v.as_i64()?;
    if (1..=5).contains(&n) {
        Some(n as u8)
    } else {
        None
    }
}

fn unparseable(raw: &str) -> JudgeVerdict {
    let excerpt: String = raw.chars().take(EXCERPT_CHARS).collect();
    JudgeVerdict {
        score: None,
        rationale: format!("Failed to parse judge response: {}", excerpt),
    }
}

/// Returns the balanced `{...}` span starting at the first `{`.
///
/// Braces inside string literals do not count, and a backslash inside a
/// string escapes the next character. Returns `None` if the object never
/// closes.
pub(crate) fn extract_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, b) in text.bytes().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}
