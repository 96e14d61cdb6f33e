use super::{exit_codes, ledger_store, load_prompts};
use crate::cli::args::{FilterArgs, GlobalArgs};
use tally_core::config::load_config;
use tally_core::errors::ConfigError;
use tally_core::report::console;

pub fn models(global: &GlobalArgs) -> anyhow::Result<i32> {
    // Results can be listed without a config.
    let configured: Vec<String> = match load_config(&global.config, global.strict_config) {
        Ok(cfg) => cfg.models.into_keys().collect(),
        Err(ConfigError::NotFound(_)) => Vec::new(),
        Err(e) => return Err(e.into()),
    };

    let (store, _) = ledger_store(global);
    let summaries: Vec<_> = store.discover()?.values().map(|l| l.summary()).collect();

    print!("{}", console::render_models(&configured, &summaries));
    Ok(exit_codes::OK)
}

pub fn prompts(global: &GlobalArgs, filter: &FilterArgs) -> anyhow::Result<i32> {
    let prompts = load_prompts(global, filter)?;
    print!("{}", console::render_prompts(&prompts));
    Ok(exit_codes::OK)
}
