use crate::config::ModelConfig;
use crate::errors::ConfigError;
use crate::model::{CompletionParams, LlmResponse};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str, params: &CompletionParams)
        -> anyhow::Result<LlmResponse>;
    fn provider_name(&self) -> &'static str;
}

pub mod anthropic;
pub mod fake;
pub mod openai;

/// Builds the client for one configured model. `name` is the config key and
/// only appears in error messages.
pub fn build_client(name: &str, cfg: &ModelConfig) -> Result<Arc<dyn LlmClient>, ConfigError> {
    let provider_err = |message: String| ConfigError::Provider {
        model: name.to_string(),
        message,
    };

    match cfg.provider.as_str() {
        "openai" => {
            let key = api_key(cfg, "OPENAI_API_KEY", cfg.base_url.is_some()).map_err(provider_err)?;
            Ok(Arc::new(openai::OpenAIClient::new(
                cfg.model.clone(),
                key,
                cfg.base_url.clone(),
            )))
        }
        "anthropic" => {
            let key = api_key(cfg, "ANTHROPIC_API_KEY", false).map_err(provider_err)?;
            Ok(Arc::new(anthropic::AnthropicClient::new(
                cfg.model.clone(),
                key,
                cfg.base_url.clone(),
            )))
        }
        "fake" => {
            let client = fake::FakeClient::new(cfg.model.clone());
            Ok(Arc::new(match &cfg.reply {
                Some(reply) => client.with_response(reply.clone()),
                None => client,
            }))
        }
        other => Err(provider_err(format!(
            "unknown provider '{}' (expected openai, anthropic or fake)",
            other
        ))),
    }
}

/// Local OpenAI-compatible servers usually need no key, so a custom base URL
/// makes the key optional.
fn api_key(cfg: &ModelConfig, default_env: &str, optional: bool) -> Result<String, String> {
    let var = cfg.api_key_env.as_deref().unwrap_or(default_env);
    match std::env::var(var) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ if optional => Ok(String::new()),
        _ => Err(format!("environment variable {} is not set", var)),
    }
}
