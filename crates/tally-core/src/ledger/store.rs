use super::{LedgerError, ModelLedger};
use crate::clock::Clock;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Reserved file stem in the results directory that is never a model ledger.
pub const COMPARISON_STEM: &str = "comparison";

/// Directory of `<model>.json` ledgers.
///
/// Persist rewrites the whole ledger through a temp file and rename, so a
/// crash leaves either the previous or the new document on disk. There is no
/// locking: two processes persisting the same model race and the last rename
/// wins.
#[derive(Clone)]
pub struct LedgerStore {
    root: PathBuf,
    clock: Arc<dyn Clock>,
}

impl LedgerStore {
    pub fn new(root: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            root: root.into(),
            clock,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, model: &str) -> Result<PathBuf, LedgerError> {
        validate_model_name(model)?;
        Ok(self.root.join(format!("{}.json", model)))
    }

    /// Returns the stored ledger, or a fresh empty one if none exists yet.
    pub fn load(&self, model: &str) -> Result<ModelLedger, LedgerError> {
        let path = self.path_for(model)?;
        if !path.exists() {
            tracing::debug!(event = "ledger.new", model = %model);
            return Ok(ModelLedger::new(model, self.clock.now()));
        }

        let raw = std::fs::read_to_string(&path).map_err(|source| LedgerError::Read {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| LedgerError::Corrupt { path, source })
    }

    /// Loads each named ledger, keeping only models with at least one run.
    pub fn load_many<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> Result<BTreeMap<String, ModelLedger>, LedgerError> {
        let mut out = BTreeMap::new();
        for name in names {
            let ledger = self.load(name.as_ref())?;
            if !ledger.is_empty() {
                out.insert(name.as_ref().to_string(), ledger);
            }
        }
        Ok(out)
    }

    /// Stamps `updated` and writes the ledger. On failure `updated` is put
    /// back, so memory never claims a write that did not reach disk.
    pub fn persist(&self, ledger: &mut ModelLedger) -> Result<PathBuf, LedgerError> {
        let path = self.path_for(&ledger.model_name)?;
        let previous = ledger.updated.replace(self.clock.now());

        if let Err(e) = self.write_document(&path, ledger) {
            ledger.updated = previous;
            return Err(e);
        }

        tracing::debug!(
            event = "ledger.persisted",
            model = %ledger.model_name,
            prompts = ledger.len(),
            path = %path.display()
        );
        Ok(path)
    }

    fn write_document(&self, path: &Path, ledger: &ModelLedger) -> Result<(), LedgerError> {
        let io_err = |source| LedgerError::Persist {
            path: path.to_path_buf(),
            source,
        };

        std::fs::create_dir_all(&self.root).map_err(io_err)?;
        let body = serde_json::to_vec_pretty(ledger)
            .map_err(|e| io_err(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.root).map_err(io_err)?;
        tmp.write_all(&body).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(path).map_err(|e| io_err(e.error))?;
        Ok(())
    }

    /// Every ledger in the results directory, keyed by model name.
    ///
    /// Other JSON may share the directory (a `compare --json` export, say), so
    /// files that do not decode as a ledger are skipped with a warning. Use
    /// [`LedgerStore::load_many`] when the names come from the user.
    pub fn discover(&self) -> Result<BTreeMap<String, ModelLedger>, LedgerError> {
        let mut out = BTreeMap::new();
        for name in self.list_models()? {
            match self.load(&name) {
                Ok(ledger) => {
                    out.insert(name, ledger);
                }
                Err(LedgerError::Corrupt { path, source }) => {
                    tracing::warn!(
                        event = "ledger.skipped",
                        path = %path.display(),
                        error = %source,
                        "skipping file that is not a model ledger"
                    );
                }
                Err(e) => return Err(e),
            }
        }
        Ok(out)
    }

    /// Sorted model names that have a ledger file.
    pub fn list_models(&self) -> Result<Vec<String>, LedgerError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let list_err = |source| LedgerError::List {
            path: self.root.clone(),
            source,
        };

        let mut names = Vec::new();
        for dirent in std::fs::read_dir(&self.root).map_err(list_err)? {
            let path = dirent.map_err(list_err)?.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if stem != COMPARISON_STEM && validate_model_name(stem).is_ok() {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

fn validate_model_name(name: &str) -> Result<(), LedgerError> {
    if name.is_empty() || name.starts_with('.') || name.contains(['/', '\\']) {
        return Err(LedgerError::InvalidModelName(name.to_string()));
    }
    Ok(())
}
