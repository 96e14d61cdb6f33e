use crate::model::PromptSpec;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read prompt catalog {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse prompt catalog {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("duplicate prompt id '{0}' in catalog")]
    DuplicateId(String),
    #[error("prompt '{id}': invalid checks.regex '{pattern}': {source}")]
    InvalidRegex {
        id: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    prompts: Vec<PromptSpec>,
}

pub fn load_catalog(path: &Path) -> Result<Vec<PromptSpec>, CatalogError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_catalog(&raw).map_err(|e| match e {
        CatalogError::Parse { source, .. } => CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}

pub fn parse_catalog(raw: &str) -> Result<Vec<PromptSpec>, CatalogError> {
    let file: CatalogFile = serde_json::from_str(raw).map_err(|source| CatalogError::Parse {
        path: PathBuf::new(),
        source,
    })?;

    let mut seen = HashSet::new();
    for p in &file.prompts {
        if !seen.insert(p.id.as_str()) {
            return Err(CatalogError::DuplicateId(p.id.clone()));
        }
        if let Some(pattern) = p.checks.as_ref().and_then(|c| c.regex.as_ref()) {
            regex::Regex::new(pattern).map_err(|source| CatalogError::InvalidRegex {
                id: p.id.clone(),
                pattern: pattern.clone(),
                source,
            })?;
        }
    }
    Ok(file.prompts)
}

/// Narrows a catalog by id, category and difficulty. Empty lists do not filter.
#[derive(Debug, Clone, Default)]
pub struct PromptFilter {
    pub ids: Vec<String>,
    pub categories: Vec<String>,
    pub difficulties: Vec<String>,
}

impl PromptFilter {
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty() && self.categories.is_empty() && self.difficulties.is_empty()
    }

    pub fn matches(&self, p: &PromptSpec) -> bool {
        let id_ok = self.ids.is_empty() || self.ids.iter().any(|id| *id == p.id);
        let cat_ok = self.categories.is_empty()
            || self
                .categories
                .iter()
                .any(|c| c.eq_ignore_ascii_case(&p.category));
        let diff_ok = self.difficulties.is_empty()
            || self
                .difficulties
                .iter()
                .any(|d| d.eq_ignore_ascii_case(&p.difficulty));
        id_ok && cat_ok && diff_ok
    }

    /// Keeps catalog order.
    pub fn apply(&self, prompts: &[PromptSpec]) -> Vec<PromptSpec> {
        prompts.iter().filter(|p| self.matches(p)).cloned().collect()
    }
}
