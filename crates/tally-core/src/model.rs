use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flag recorded on entries whose primary provider call failed.
pub const API_ERROR_FLAG: &str = "API_ERROR";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromptSpec {
    pub id: String,
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    #[serde(default)]
    pub difficulty: String,
    pub prompt: String,
    #[serde(default)]
    pub ideal: String,
    #[serde(default)]
    pub criteria: Criteria,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checks: Option<CheckSpec>,
}

/// Grading criteria: free text, or a list rendered as bullets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Criteria {
    BulletList(Vec<String>),
    Text(String),
}

impl Default for Criteria {
    fn default() -> Self {
        Criteria::BulletList(Vec::new())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CheckSpec {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub must_contain: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub must_not_contain: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_words: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AutoChecks {
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default)]
    pub auto_scores: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub passed: bool,
}

impl AutoChecks {
    pub fn api_error() -> Self {
        Self {
            flags: vec![API_ERROR_FLAG.to_string()],
            auto_scores: BTreeMap::new(),
            passed: false,
        }
    }

    pub fn is_flagged(&self) -> bool {
        !self.flags.is_empty()
    }
}

/// One attempt's recorded outcome for one prompt.
///
/// Built only through [`RunEntry::completed`] or [`RunEntry::failed`], so an
/// entry is either a finished response with auto-check results or an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunEntry {
    pub timestamp: String,
    pub api_model: String,
    #[serde(default)]
    pub content: String,
    pub latency_s: f64,
    #[serde(default)]
    pub input_tokens: Option<u64>,
    #[serde(default)]
    pub output_tokens: Option<u64>,
    #[serde(default)]
    pub auto_checks: AutoChecks,
    #[serde(default)]
    pub judge_score: Option<u8>,
    #[serde(default)]
    pub judge_rationale: String,
    #[serde(default)]
    pub judge_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunEntry {
    pub fn completed(
        timestamp: String,
        api_model: String,
        response: &LlmResponse,
        latency_s: f64,
        auto_checks: AutoChecks,
        judge_model: Option<String>,
    ) -> Self {
        Self {
            timestamp,
            api_model,
            content: response.text.clone(),
            latency_s: round_latency(latency_s),
            input_tokens: response.usage.input_tokens,
            output_tokens: response.usage.output_tokens,
            auto_checks,
            judge_score: None,
            judge_rationale: String::new(),
            judge_model,
            error: None,
        }
    }

    pub fn failed(
        timestamp: String,
        api_model: String,
        latency_s: f64,
        error: String,
        judge_model: Option<String>,
    ) -> Self {
        Self {
            timestamp,
            api_model,
            content: String::new(),
            latency_s: round_latency(latency_s),
            input_tokens: None,
            output_tokens: None,
            auto_checks: AutoChecks::api_error(),
            judge_score: None,
            judge_rationale: String::new(),
            judge_model,
            error: Some(error),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn with_verdict(mut self, verdict: crate::judge::JudgeVerdict) -> Self {
        self.judge_score = verdict.score;
        self.judge_rationale = verdict.rationale;
        self
    }
}

fn round_latency(secs: f64) -> f64 {
    (secs * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    #[serde(default)]
    pub input_tokens: Option<u64>,
    #[serde(default)]
    pub output_tokens: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmResponse {
    pub text: String,
    pub provider: String,
    pub model: String,
    #[serde(default)]
    pub usage: Usage,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CompletionParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn criteria_accepts_text_or_list() {
        let text: Criteria = serde_json::from_str(r#""be concise""#).unwrap();
        assert_eq!(text, Criteria::Text("be concise".into()));

        let list: Criteria = serde_json::from_str(r#"["a", "b"]"#).unwrap();
        assert_eq!(list, Criteria::BulletList(vec!["a".into(), "b".into()]));
    }

    #[test]
    fn failed_entry_carries_api_error_flag() {
        let e = RunEntry::failed("t".into(), "m".into(), 1.234, "boom".into(), None);
        assert!(e.is_error());
        assert!(e.content.is_empty());
        assert_eq!(e.auto_checks.flags, vec![API_ERROR_FLAG.to_string()]);
        assert!(!e.auto_checks.passed);
        assert_eq!(e.judge_score, None);
        assert_eq!(e.latency_s, 1.23);
    }

    #[test]
    fn error_field_is_omitted_for_completed_entries() {
        let resp = LlmResponse {
            text: "hi".into(),
            ..Default::default()
        };
        let e = RunEntry::completed("t".into(), "m".into(), &resp, 0.5, AutoChecks::default(), None);
        let v = serde_json::to_value(&e).unwrap();
        assert!(v.get("error").is_none());
        assert_eq!(v["content"], "hi");
    }
}
