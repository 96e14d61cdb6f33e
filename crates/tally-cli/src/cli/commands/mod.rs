use super::args::{Cli, Command, FilterArgs, GlobalArgs};
use anyhow::Context;
use std::sync::Arc;
use tally_core::catalog::{load_catalog, PromptFilter};
use tally_core::clock::{Clock, SystemClock};
use tally_core::ledger::LedgerStore;
use tally_core::model::PromptSpec;

pub mod compare;
pub mod eval;
pub mod init;
pub mod list;

pub mod exit_codes {
    pub const OK: i32 = 0;
    pub const NO_RESULTS: i32 = 1;
    pub const CONFIG_ERROR: i32 = 2;
}

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    let global = cli.global;
    match cli.cmd {
        Command::Eval(args) => eval::run(&global, args).await,
        Command::Compare(args) => compare::run(&global, args),
        Command::Models => list::models(&global),
        Command::Prompts(filter) => list::prompts(&global, &filter),
        Command::Init => init::run(&global),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(exit_codes::OK)
        }
    }
}

impl From<&FilterArgs> for PromptFilter {
    fn from(f: &FilterArgs) -> Self {
        PromptFilter {
            ids: f.ids.clone(),
            categories: f.category.clone(),
            difficulties: f.difficulty.clone(),
        }
    }
}

/// Loads the catalog and applies the filter. An empty result is an error.
fn load_prompts(global: &GlobalArgs, filter: &FilterArgs) -> anyhow::Result<Vec<PromptSpec>> {
    let catalog = load_catalog(&global.prompts)?;
    let filter = PromptFilter::from(filter);
    let prompts = filter.apply(&catalog);
    if prompts.is_empty() {
        anyhow::bail!(
            "no prompts in {} match the given filters",
            global.prompts.display()
        );
    }
    Ok(prompts)
}

fn ledger_store(global: &GlobalArgs) -> (LedgerStore, Arc<dyn Clock>) {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    (LedgerStore::new(&global.results_dir, clock.clone()), clock)
}

fn write_file_if_missing(path: &std::path::Path, content: &str) -> anyhow::Result<()> {
    if path.exists() {
        eprintln!("note: {} already exists (skipped)", path.display());
        return Ok(());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
    eprintln!("created {}", path.display());
    Ok(())
}
