use super::ModelLedger;
use crate::model::PromptSpec;

/// Which prompts a batch will run, and which were skipped because the ledger
/// already has a result for them.
#[derive(Debug, Clone, Default)]
pub struct BatchPlan {
    pub to_run: Vec<PromptSpec>,
    pub already_done: Vec<String>,
}

impl BatchPlan {
    pub fn is_empty(&self) -> bool {
        self.to_run.is_empty()
    }
}

/// Excludes prompts that already have a run unless `force` is set. Forced
/// prompts get a new entry appended; earlier entries stay as they are.
pub fn plan_batch(ledger: &ModelLedger, prompts: &[PromptSpec], force: bool) -> BatchPlan {
    if force {
        return BatchPlan {
            to_run: prompts.to_vec(),
            already_done: Vec::new(),
        };
    }

    let (done, fresh): (Vec<_>, Vec<_>) =
        prompts.iter().cloned().partition(|p| ledger.contains(&p.id));

    let mut already_done: Vec<String> = done.into_iter().map(|p| p.id).collect();
    already_done.sort();

    BatchPlan {
        to_run: fresh,
        already_done,
    }
}
