//! LLM-as-judge scoring.
//!
//! `prompt` assembles the judge request, `parse` turns the judge's free text
//! into a verdict, and [`JudgeService`] ties them to a client. The service
//! never returns an error: any failure becomes a verdict with no score so the
//! evaluation loop can move on to the next prompt.

pub mod parse;
pub mod prompt;

pub use parse::parse_judge_output;
pub use prompt::build_judge_prompt;

use crate::model::{AutoChecks, CompletionParams, PromptSpec};
use crate::providers::llm::LlmClient;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgeVerdict {
    pub score: Option<u8>,
    pub rationale: String,
}

#[derive(Clone)]
pub struct JudgeService {
    name: String,
    client: Arc<dyn LlmClient>,
    params: CompletionParams,
}

impl JudgeService {
    pub fn new(name: impl Into<String>, client: Arc<dyn LlmClient>, params: CompletionParams) -> Self {
        Self {
            name: name.into(),
            client,
            params,
        }
    }

    /// Config name of the judge model, recorded on every entry.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn judge(
        &self,
        prompt: &PromptSpec,
        response: &str,
        auto: &AutoChecks,
    ) -> JudgeVerdict {
        let request = build_judge_prompt(prompt, response, auto);

        match self.client.complete(&request, &self.params).await {
            Ok(resp) => {
                let verdict = parse_judge_output(&resp.text);
                tracing::debug!(
                    event = "judge.verdict",
                    prompt_id = %prompt.id,
                    judge = %self.name,
                    score = ?verdict.score
                );
                verdict
            }
            Err(e) => {
                tracing::warn!(
                    event = "judge.error",
                    prompt_id = %prompt.id,
                    judge = %self.name,
                    error = %e,
                    "judge call failed"
                );
                JudgeVerdict {
                    score: None,
                    rationale: format!("Judge error: {}", e),
                }
            }
        }
    }
}
