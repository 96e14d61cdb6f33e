use super::{exit_codes, write_file_if_missing};
use crate::cli::args::GlobalArgs;
use crate::templates;
use tally_core::config::write_sample_config;

pub fn run(global: &GlobalArgs) -> anyhow::Result<i32> {
    if global.config.exists() {
        eprintln!("note: {} already exists (skipped)", global.config.display());
    } else {
        if let Some(parent) = global.config.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        write_sample_config(&global.config)?;
        eprintln!("created {}", global.config.display());
    }
    write_file_if_missing(&global.prompts, templates::SAMPLE_CATALOG)?;
    Ok(exit_codes::OK)
}
