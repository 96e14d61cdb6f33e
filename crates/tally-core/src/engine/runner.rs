use crate::aggregate::BatchSummary;
use crate::checks::AutoChecker;
use crate::clock::Clock;
use crate::judge::JudgeService;
use crate::ledger::{LedgerError, LedgerStore, ModelLedger};
use crate::model::{CompletionParams, PromptSpec, RunEntry};
use crate::providers::llm::LlmClient;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Progress report handed to the caller after each prompt is persisted.
#[derive(Debug, Clone, Copy)]
pub struct PromptOutcome<'a> {
    pub index: usize,
    pub total: usize,
    pub prompt: &'a PromptSpec,
    pub entry: &'a RunEntry,
}

/// Runs prompts against one model, strictly one at a time.
///
/// Each prompt goes provider call, auto-check, then judge (only after a
/// successful call). The resulting entry is appended and the whole ledger is
/// persisted before the next prompt starts.
pub struct Evaluator {
    pub store: LedgerStore,
    pub client: Arc<dyn LlmClient>,
    /// Provider-side model id recorded on each entry.
    pub api_model: String,
    pub params: CompletionParams,
    pub checker: Arc<dyn AutoChecker>,
    pub judge: Option<JudgeService>,
    pub clock: Arc<dyn Clock>,
    pub delay: Duration,
}

impl Evaluator {
    pub async fn run_batch<F>(
        &self,
        ledger: &mut ModelLedger,
        prompts: &[PromptSpec],
        mut on_outcome: F,
    ) -> Result<BatchSummary, LedgerError>
    where
        F: FnMut(PromptOutcome<'_>),
    {
        let total = prompts.len();
        tracing::info!(
            event = "batch.start",
            model = %ledger.model_name,
            prompts = total,
            judge = self.judge.as_ref().map(|j| j.name()).unwrap_or("none")
        );

        for (i, prompt) in prompts.iter().enumerate() {
            let entry = self.run_prompt(prompt).await;
            ledger.append(&prompt.id, entry);
            self.store.persist(ledger)?;

            if let Some(entry) = ledger.latest(&prompt.id) {
                on_outcome(PromptOutcome {
                    index: i + 1,
                    total,
                    prompt,
                    entry,
                });
            }

            if i + 1 < total && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        let summary = BatchSummary::from_ledger(ledger, prompts);
        tracing::info!(
            event = "batch.done",
            model = %ledger.model_name,
            flagged = summary.flagged,
            judged = summary.judged,
            errors = summary.errors
        );
        Ok(summary)
    }

    /// Produces the entry for one prompt. Provider failures become error
    /// entries; nothing here fails the batch.
    pub async fn run_prompt(&self, prompt: &PromptSpec) -> RunEntry {
        let judge_model = self.judge.as_ref().map(|j| j.name().to_string());
        let timestamp = self.clock.now();
        let start = Instant::now();

        let resp = match self.client.complete(&prompt.prompt, &self.params).await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(
                    event = "provider.error",
                    prompt_id = %prompt.id,
                    provider = self.client.provider_name(),
                    error = %e
                );
                return RunEntry::failed(
                    timestamp,
                    self.api_model.clone(),
                    start.elapsed().as_secs_f64(),
                    e.to_string(),
                    judge_model,
                );
            }
        };
        let latency = start.elapsed().as_secs_f64();

        let auto = self.checker.check(prompt, &resp.text);
        let entry = RunEntry::completed(
            timestamp,
            self.api_model.clone(),
            &resp,
            latency,
            auto,
            judge_model,
        );

        match &self.judge {
            Some(judge) => {
                let verdict = judge.judge(prompt, &entry.content, &entry.auto_checks).await;
                entry.with_verdict(verdict)
            }
            None => entry,
        }
    }
}
