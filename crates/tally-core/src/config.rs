use crate::errors::ConfigError;
use crate::model::CompletionParams;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub mod resolve;

pub const DEFAULT_DELAY_SECS: f64 = 1.0;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub models: BTreeMap<String, ModelConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub judge: Option<JudgeSettings>,
    #[serde(default)]
    pub eval: EvalSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelConfig {
    pub provider: String,
    /// Provider-side model id; recorded on every entry as `api_model`.
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    #[serde(default)]
    pub params: CompletionParams,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct JudgeSettings {
    pub model: Option<String>,
    #[serde(default)]
    pub params: CompletionParams,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvalSettings {
    #[serde(default = "default_delay")]
    pub delay_between_calls: f64,
}

impl Default for EvalSettings {
    fn default() -> Self {
        Self {
            delay_between_calls: DEFAULT_DELAY_SECS,
        }
    }
}

fn default_delay() -> f64 {
    DEFAULT_DELAY_SECS
}

pub fn load_config(path: &Path, strict: bool) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&raw, path, strict)
}

pub fn parse_config(raw: &str, path: &Path, strict: bool) -> Result<Config, ConfigError> {
    let mut ignored_keys = std::collections::BTreeSet::new();
    let deserializer = serde_yaml::Deserializer::from_str(raw);

    let cfg: Config = serde_ignored::deserialize(deserializer, |p| {
        ignored_keys.insert(p.to_string());
    })
    .map_err(|e| ConfigError::Parse(e.to_string()))?;

    // YAML anchors and extension keys are allowed anywhere
    let meaningful: Vec<String> = ignored_keys
        .into_iter()
        .filter(|k| !k.starts_with('_') && !k.starts_with("x-") && k != "definitions")
        .collect();

    if !meaningful.is_empty() {
        if strict {
            return Err(ConfigError::UnknownFields {
                keys: meaningful,
                path: path.to_path_buf(),
            });
        }
        tracing::warn!(
            event = "config.unknown_fields",
            keys = ?meaningful,
            path = %path.display(),
            "ignored unknown config fields"
        );
    }

    Ok(cfg)
}

pub fn write_sample_config(path: &Path) -> Result<(), ConfigError> {
    std::fs::write(
        path,
        r#"models:
  gpt-4o:
    provider: openai
    model: gpt-4o-2024-08-06
    api_key_env: OPENAI_API_KEY
    params:
      temperature: 0.0
      max_tokens: 2048
  claude-sonnet:
    provider: anthropic
    model: claude-sonnet-4-5-20250929
    api_key_env: ANTHROPIC_API_KEY
    params:
      max_tokens: 2048
  local-llama:
    provider: openai
    model: llama3.1:8b
    base_url: http://localhost:11434/v1
    params:
      temperature: 0.2

judge:
  model: claude-sonnet
  params:
    temperature: 0.0
    max_tokens: 512

eval:
  delay_between_calls: 1.0
"#,
    )
    .map_err(|source| ConfigError::WriteSample {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}
