use super::LlmClient;
use crate::model::{CompletionParams, LlmResponse, Usage};
use async_trait::async_trait;
use serde_json::{json, Value};

const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Anthropic Messages API (`POST /v1/messages`).
pub struct AnthropicClient {
    pub model: String,
    pub api_key: String,
    pub base_url: String,
    pub client: reqwest::Client,
}

impl AnthropicClient {
    pub fn new(model: String, api_key: String, base_url: Option<String>) -> Self {
        Self {
            model,
            api_key,
            base_url: base_url
                .unwrap_or_else(|| ANTHROPIC_API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn request_body(&self, prompt: &str, params: &CompletionParams) -> Value {
        let mut body = json!({
            "model": self.model,
            "max_tokens": params.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            "messages": [{ "role": "user", "content": prompt }],
        });
        if let Some(t) = params.temperature {
            body["temperature"] = json!(t);
        }
        if let Some(system) = &params.system {
            body["system"] = json!(system);
        }
        body
    }
}

#[async_trait]
impl LlmClient for AnthropicClient {
    async fn complete(
        &self,
        prompt: &str,
        params: &CompletionParams,
    ) -> anyhow::Result<LlmResponse> {
        let resp = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&self.request_body(prompt, params))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_text = resp.text().await.unwrap_or_default();
            anyhow::bail!("Anthropic messages API error ({}): {}", status, error_text);
        }

        let json: Value = resp.json().await?;
        parse_response(&json, &self.model)
    }

    fn provider_name(&self) -> &'static str {
        "anthropic"
    }
}

/// Concatenates the text blocks of the reply; other block types are ignored.
fn parse_response(json: &Value, model: &str) -> anyhow::Result<LlmResponse> {
    let blocks = json
        .get("content")
        .and_then(|v| v.as_array())
        .ok_or_else(|| anyhow::anyhow!("Anthropic API response missing content"))?;

    let text: String = blocks
        .iter()
        .filter(|b| b.get("type").and_then(|t| t.as_str()) == Some("text"))
        .filter_map(|b| b.get("text").and_then(|t| t.as_str()))
        .collect::<Vec<_>>()
        .join("");

    Ok(LlmResponse {
        text,
        provider: "anthropic".to_string(),
        model: json
            .get("model")
            .and_then(|v| v.as_str())
            .unwrap_or(model)
            .to_string(),
        usage: Usage {
            input_tokens: json.pointer("/usage/input_tokens").and_then(|v| v.as_u64()),
            output_tokens: json.pointer("/usage/output_tokens").and_then(|v| v.as_u64()),
        },
    })
}
