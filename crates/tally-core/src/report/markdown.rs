use crate::aggregate::Comparison;
use crate::ledger::ModelLedger;
use crate::model::PromptSpec;
use anyhow::Context;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::Path;

/// Markdown report: the leaderboard followed by every model's latest verdict
/// per prompt, in leaderboard order.
pub fn render_markdown(
    cmp: &Comparison,
    ledgers: &BTreeMap<String, ModelLedger>,
    prompts: &[PromptSpec],
    generated_at: &str,
) -> String {
    let mut out = String::from("# Model comparison\n\n");
    let _ = writeln!(out, "_Generated {}_\n", generated_at);

    out.push_str("## Leaderboard\n\n");
    out.push_str("| Model | Avg score | Scored | Errors | Flagged | Avg latency | Avg tokens | Efficiency |\n");
    out.push_str("|---|---|---|---|---|---|---|---|\n");
    for r in &cmp.leaderboard {
        let score = if r.has_scores() {
            format!("{:.2}/5", r.avg_score)
        } else {
            "-".to_string()
        };
        let _ = writeln!(
            out,
            "| {} | {} | {}/{} | {} | {} | {:.1}s | {:.0} | {:.2} |",
            r.name, score, r.scored, r.total, r.errors, r.flagged, r.avg_latency, r.avg_tokens, r.efficiency
        );
    }

    out.push_str("\n## Per-prompt detail\n");
    for p in prompts {
        let _ = writeln!(out, "\n### {} ({}, {})\n", p.id, p.subcategory, p.difficulty);
        for r in &cmp.leaderboard {
            let Some(run) = ledgers.get(&r.name).and_then(|l| l.latest(&p.id)) else {
                continue;
            };
            let mut line = format!("- **{}**: ", r.name);
            match (&run.error, run.judge_score) {
                (Some(err), _) => {
                    let _ = write!(line, "error: {}", err);
                }
                (None, Some(score)) => {
                    let _ = write!(line, "score {}", score);
                }
                (None, None) => line.push_str("unscored"),
            }
            if run.auto_checks.is_flagged() && !run.is_error() {
                let _ = write!(line, " [{}]", run.auto_checks.flags.join(", "));
            }
            if !run.judge_rationale.is_empty() {
                let _ = write!(line, ": {}", run.judge_rationale.replace('\n', " "));
            }
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}

pub fn write_markdown(report: &str, out: &Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(out, report).with_context(|| format!("failed to write {}", out.display()))
}
