use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "tally",
    version,
    about = "Benchmark language models on a fixed prompt set and compare them over time"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(clap::Args, Debug, Clone)]
pub struct GlobalArgs {
    #[arg(long, global = true, default_value = "config.yaml", env = "TALLY_CONFIG")]
    pub config: PathBuf,

    /// Directory holding one `<model>.json` ledger per model
    #[arg(long, global = true, default_value = "results", env = "TALLY_RESULTS_DIR")]
    pub results_dir: PathBuf,

    /// Prompt catalog
    #[arg(long, global = true, default_value = "evals/default.json")]
    pub prompts: PathBuf,

    /// Fail on unknown config keys instead of warning
    #[arg(long, global = true)]
    pub strict_config: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the prompt set against one configured model
    Eval(EvalArgs),
    /// Leaderboard, per-category scores and flags across models
    Compare(CompareArgs),
    /// List configured and evaluated models
    Models,
    /// List the prompt catalog
    Prompts(FilterArgs),
    /// Write a sample config.yaml
    Init,
    Version,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct FilterArgs {
    #[arg(long, num_args = 1..)]
    pub ids: Vec<String>,

    #[arg(long, num_args = 1..)]
    pub category: Vec<String>,

    #[arg(long, num_args = 1..)]
    pub difficulty: Vec<String>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct EvalArgs {
    /// Model name as configured under `models:`
    pub model: String,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Run prompts again even if the ledger already has a result for them
    #[arg(long)]
    pub rerun: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct CompareArgs {
    /// Models to compare (default: every model with results)
    pub models: Vec<String>,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Also write the comparison as JSON
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Also write a markdown report to `<results-dir>/comparison.md`
    #[arg(long)]
    pub save: bool,
}
