use super::{exit_codes, ledger_store, load_prompts};
use crate::cli::args::{CompareArgs, GlobalArgs};
use tally_core::aggregate::aggregate;
use tally_core::report::{console, render_markdown, write_json, write_markdown};

pub const MARKDOWN_REPORT: &str = "comparison.md";

pub fn run(global: &GlobalArgs, args: CompareArgs) -> anyhow::Result<i32> {
    let prompts = load_prompts(global, &args.filter)?;
    let (store, clock) = ledger_store(global);

    let ledgers = if args.models.is_empty() {
        let mut found = store.discover()?;
        found.retain(|_, ledger| !ledger.is_empty());
        found
    } else {
        let ledgers = store.load_many(&args.models)?;
        for name in args.models.iter().filter(|n| !ledgers.contains_key(*n)) {
            eprintln!("note: no results for '{}'", name);
        }
        ledgers
    };

    if ledgers.is_empty() {
        eprintln!("No results to compare. Run `tally eval <model>` first.");
        return Ok(exit_codes::NO_RESULTS);
    }

    let cmp = aggregate(&ledgers, &prompts);
    print!("{}", console::render_comparison(&cmp));

    if let Some(path) = &args.json {
        write_json(&cmp, path)?;
        eprintln!("wrote {}", path.display());
    }
    if args.save {
        let path = global.results_dir.join(MARKDOWN_REPORT);
        let report = render_markdown(&cmp, &ledgers, &prompts, &clock.now());
        write_markdown(&report, &path)?;
        eprintln!("wrote {}", path.display());
    }
    Ok(exit_codes::OK)
}
