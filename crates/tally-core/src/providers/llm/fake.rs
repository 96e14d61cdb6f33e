use super::LlmClient;
use crate::model::{CompletionParams, LlmResponse, Usage};
use async_trait::async_trait;

/// Offline client returning a fixed reply. Token usage is a word count so
/// aggregates built on fake runs still have something to average.
#[derive(Debug)]
pub struct FakeClient {
    model: String,
    fixed_response: Option<String>,
}

impl FakeClient {
    pub fn new(model: String) -> Self {
        Self {
            model,
            fixed_response: None,
        }
    }

    pub fn with_response(mut self, response: String) -> Self {
        self.fixed_response = Some(response);
        self
    }
}

#[async_trait]
impl LlmClient for FakeClient {
    async fn complete(
        &self,
        prompt: &str,
        _params: &CompletionParams,
    ) -> anyhow::Result<LlmResponse> {
        let text = self
            .fixed_response
            .clone()
            .unwrap_or_else(|| format!("echo: {}", prompt));

        Ok(LlmResponse {
            usage: Usage {
                input_tokens: Some(prompt.split_whitespace().count() as u64),
                output_tokens: Some(text.split_whitespace().count() as u64),
            },
            text,
            provider: "fake".to_string(),
            model: self.model.clone(),
        })
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}
