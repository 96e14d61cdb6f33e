use super::LlmClient;
use crate::model::{CompletionParams, LlmResponse, Usage};
use async_trait::async_trait;
use serde_json::json;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Any OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAIClient {
    pub model: String,
    pub api_key: String,
    pub base_url: String,
    pub client: reqwest::Client,
}

impl OpenAIClient {
    pub fn new(model: String, api_key: String, base_url: Option<String>) -> Self {
        Self {
            model,
            api_key,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn request_body(&self, prompt: &str, params: &CompletionParams) -> serde_json::Value {
        let mut messages = Vec::new();
        if let Some(system) = &params.system {
            messages.push(json!({ "role": "system", "content": system }));
        }
        messages.push(json!({ "role": "user", "content": prompt }));

        let mut body = json!({
            "model": self.model,
            "messages": messages,
        });
        if let Some(t) = params.temperature {
            body["temperature"] = json!(t);
        }
        if let Some(m) = params.max_tokens {
            body["max_tokens"] = json!(m);
        }
        body
    }
}

#[async_trait]
impl LlmClient for OpenAIClient {
    async fn complete(
        &self,
        prompt: &str,
        params: &CompletionParams,
    ) -> anyhow::Result<LlmResponse> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut req = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&self.request_body(prompt, params));
        if !self.api_key.is_empty() {
            req = req.header("Authorization", format!("Bearer {}", self.api_key));
        }

        let resp = req.send().await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let error_text = resp.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI chat API error ({}): {}", status, error_text);
        }

        let json: serde_json::Value = resp.json().await?;
        parse_response(&json, &self.model)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

fn parse_response(json: &serde_json::Value, model: &str) -> anyhow::Result<LlmResponse> {
    let text = json
        .pointer("/choices/0/message/content")
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("OpenAI API response missing content"))?
        .to_string();

    let usage = Usage {
        input_tokens: json.pointer("/usage/prompt_tokens").and_then(|v| v.as_u64()),
        output_tokens: json
            .pointer("/usage/completion_tokens")
            .and_then(|v| v.as_u64()),
    };

    Ok(LlmResponse {
        text,
        provider: "openai".to_string(),
        model: json
            .get("model")
            .and_then(|v| v.as_str())
            .unwrap_or(model)
            .to_string(),
        usage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_includes_only_set_params() {
        let c = OpenAIClient::new("gpt-x".into(), String::new(), Some("http://h/v1/".into()));
        assert_eq!(c.base_url, "http://h/v1");

        let body = c.request_body("hi", &CompletionParams::default());
        assert!(body.get("temperature").is_none());
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);

        let params = CompletionParams {
            temperature: Some(0.0),
            max_tokens: Some(64),
            system: Some("be terse".into()),
        };
        let body = c.request_body("hi", &params);
        assert_eq!(body["max_tokens"], 64);
        assert_eq!(body["messages"][0]["role"], "system");
    }

    #[test]
    fn parses_content_and_usage() {
        let json = json!({
            "model": "gpt-x-0613",
            "choices": [{"message": {"role": "assistant", "content": "hello"}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 3}
        });
        let r = parse_response(&json, "gpt-x").unwrap();
        assert_eq!(r.text, "hello");
        assert_eq!(r.model, "gpt-x-0613");
        assert_eq!(r.usage.output_tokens, Some(3));

        assert!(parse_response(&json!({"choices": []}), "gpt-x").is_err());
    }
}
