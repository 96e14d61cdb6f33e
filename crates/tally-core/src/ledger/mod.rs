//! Per-model, append-only history of run attempts.
//!
//! A [`ModelLedger`] maps prompt ids to the ordered list of every attempt made
//! for that prompt. Entries are only ever appended; the last one is the
//! prompt's current result. [`LedgerStore`] loads and persists ledgers as one
//! JSON document per model.

pub mod plan;
pub mod store;

pub use plan::{plan_batch, BatchPlan};
pub use store::LedgerStore;

use crate::model::RunEntry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

pub type RunHistory = Vec<RunEntry>;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("invalid model name '{0}' (must not contain path separators or start with '.')")]
    InvalidModelName(String),

    #[error("failed to read ledger {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ledger {} is not valid ledger JSON: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to persist ledger {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to list results directory {}: {source}", path.display())]
    List {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelLedger {
    pub model_name: String,
    pub created: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(default)]
    runs: BTreeMap<String, RunHistory>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerSummary {
    pub model_name: String,
    pub prompts: usize,
    pub scored: usize,
    pub last_update: String,
}

impl ModelLedger {
    pub fn new(model_name: impl Into<String>, created: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            created: created.into(),
            updated: None,
            runs: BTreeMap::new(),
        }
    }

    pub fn append(&mut self, prompt_id: &str, entry: RunEntry) {
        self.runs.entry(prompt_id.to_string()).or_default().push(entry);
    }

    pub fn latest(&self, prompt_id: &str) -> Option<&RunEntry> {
        self.runs.get(prompt_id).and_then(|h| h.last())
    }

    pub fn history(&self, prompt_id: &str) -> &[RunEntry] {
        self.runs.get(prompt_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, prompt_id: &str) -> bool {
        self.runs.contains_key(prompt_id)
    }

    pub fn prompt_ids(&self) -> impl Iterator<Item = &str> {
        self.runs.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn summary(&self) -> LedgerSummary {
        let scored = self
            .runs
            .values()
            .filter_map(|h| h.last())
            .filter(|e| e.judge_score.is_some())
            .count();
        LedgerSummary {
            model_name: self.model_name.clone(),
            prompts: self.runs.len(),
            scored,
            last_update: self.updated.clone().unwrap_or_else(|| self.created.clone()),
        }
    }
}
