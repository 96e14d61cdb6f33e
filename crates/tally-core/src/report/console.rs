use crate::aggregate::{BatchSummary, Comparison};
use crate::engine::PromptOutcome;
use crate::ledger::LedgerSummary;
use crate::model::PromptSpec;
use std::fmt::Write;

const EXCERPT: usize = 60;

pub fn render_comparison(cmp: &Comparison) -> String {
    if cmp.leaderboard.is_empty() {
        return "No results yet. Run `tally eval <model>` first.\n".to_string();
    }
    let mut out = String::new();
    out.push_str(&render_leaderboard(cmp));
    out.push('\n');
    out.push_str(&render_categories(cmp));
    out.push('\n');
    out.push_str(&render_flags(cmp));
    out
}

pub fn render_leaderboard(cmp: &Comparison) -> String {
    let width = name_width(cmp.leaderboard.iter().map(|r| r.name.as_str()));
    let mut out = format!(
        "Leaderboard ({} prompts, {} models)\n",
        cmp.total_prompts, cmp.total_models
    );
    let _ = writeln!(
        out,
        "  {:>2}  {:<width$}  {:>5}  {:>7}  {:>6}  {:>5}  {:>7}  {:>7}  {:>7}  {:>5}",
        "#", "model", "score", "scored", "errors", "flags", "lat", "lat p50", "tokens", "eff"
    );
    for (i, r) in cmp.leaderboard.iter().enumerate() {
        let score = if r.has_scores() {
            format!("{:.2}", r.avg_score)
        } else {
            "-".to_string()
        };
        let _ = writeln!(
            out,
            "  {:>2}  {:<width$}  {:>5}  {:>7}  {:>6}  {:>5}  {:>6.2}s  {:>6.2}s  {:>7.0}  {:>5.2}",
            i + 1,
            r.name,
            score,
            format!("{}/{}", r.scored, r.total),
            r.errors,
            r.flagged,
            r.avg_latency,
            r.median_latency,
            r.avg_tokens,
            r.efficiency
        );
    }
    out
}

pub fn render_categories(cmp: &Comparison) -> String {
    let width = name_width(cmp.categories.iter().map(String::as_str));
    let mut out = String::from("Scores by category\n");
    let mut header = format!("  {:<width$}", "category");
    for r in &cmp.leaderboard {
        let _ = write!(header, "  {:>10}", truncate(&r.name, 10));
    }
    out.push_str(header.trim_end());
    out.push('\n');

    for cat in &cmp.categories {
        let mut line = format!("  {:<width$}", cat);
        for r in &cmp.leaderboard {
            let cell = match r.cat_scores.get(cat).copied().flatten() {
                Some(avg) => format!("{:.2}", avg),
                None => "-".to_string(),
            };
            let _ = write!(line, "  {:>10}", cell);
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

pub fn render_flags(cmp: &Comparison) -> String {
    let mut out = String::from("Flagged responses\n");
    if cmp.flags.is_empty() {
        out.push_str("  none, every response passed auto-checks\n");
    }
    for f in &cmp.flags {
        if f.subcategory.is_empty() {
            let _ = writeln!(out, "  {}", f.id);
        } else {
            let _ = writeln!(out, "  {} ({})", f.id, f.subcategory);
        }
        for (model, flags) in &f.models {
            let _ = writeln!(out, "    {}: {}", model, flags.join(", "));
        }
    }
    out
}

/// `configured` is every model in the config; models without a ledger are
/// listed as not yet run.
pub fn render_models(configured: &[String], summaries: &[LedgerSummary]) -> String {
    let names = configured
        .iter()
        .map(String::as_str)
        .chain(summaries.iter().map(|s| s.model_name.as_str()));
    let width = name_width(names);

    let mut out = String::new();
    for name in configured {
        match summaries.iter().find(|s| &s.model_name == name) {
            Some(s) => {
                let _ = writeln!(
                    out,
                    "  {:<width$}  {:>4} prompts  {:>4} scored  updated {}",
                    name, s.prompts, s.scored, s.last_update
                );
            }
            None => {
                let _ = writeln!(out, "  {:<width$}  not run", name);
            }
        }
    }
    for s in summaries.iter().filter(|s| !configured.contains(&s.model_name)) {
        let _ = writeln!(
            out,
            "  {:<width$}  {:>4} prompts  {:>4} scored  updated {}  (not in config)",
            s.model_name, s.prompts, s.scored, s.last_update
        );
    }
    if out.is_empty() {
        out.push_str("No models configured. Run `tally init` to write a sample config.\n");
    }
    out
}

pub fn render_prompts(prompts: &[PromptSpec]) -> String {
    let width = name_width(prompts.iter().map(|p| p.id.as_str()));
    let mut out = String::new();
    for p in prompts {
        let _ = writeln!(
            out,
            "  {:<width$}  {:<12} {:<8} {}",
            p.id,
            truncate(&p.category, 12),
            truncate(&p.difficulty, 8),
            truncate(&one_line(&p.prompt), EXCERPT)
        );
    }
    let _ = writeln!(out, "{} prompts", prompts.len());
    out
}

pub fn outcome_line(o: &PromptOutcome<'_>) -> String {
    let e = o.entry;
    let head = format!("[{}/{}] {}", o.index, o.total, o.prompt.id);
    if let Some(err) = &e.error {
        return format!("{}  ERROR ({:.2}s): {}", head, e.latency_s, truncate(err, EXCERPT));
    }
    let score = e
        .judge_score
        .map(|s| format!("{}/5", s))
        .unwrap_or_else(|| "-".to_string());
    let mut line = format!("{}  {:>3}  {:.2}s", head, score, e.latency_s);
    if let Some(t) = e.output_tokens {
        let _ = write!(line, "  {} tok", t);
    }
    if e.auto_checks.is_flagged() {
        let _ = write!(line, "  [{}]", e.auto_checks.flags.join(", "));
    }
    line
}

pub fn render_batch_summary(model: &str, s: &BatchSummary, skipped: usize) -> String {
    let mut out = format!(
        "{}: {} prompts, {} judged, {} flagged, {} errors",
        model, s.prompts, s.judged, s.flagged, s.errors
    );
    if skipped > 0 {
        let _ = write!(out, " ({} already done, use --rerun to repeat)", skipped);
    }
    out
}

fn name_width<'a>(names: impl Iterator<Item = &'a str>) -> usize {
    names.map(|n| n.chars().count()).max().unwrap_or(0).max(8)
}

fn one_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut t: String = s.chars().take(max.saturating_sub(3)).collect();
    t.push_str("...");
    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::ledger::ModelLedger;
    use crate::model::{AutoChecks, Criteria, LlmResponse, RunEntry};
    use std::collections::BTreeMap;

    fn prompt(id: &str, category: &str) -> PromptSpec {
        PromptSpec {
            id: id.into(),
            category: category.into(),
            subcategory: "sub".into(),
            difficulty: "hard".into(),
            prompt: "Explain\n  the thing".into(),
            ideal: String::new(),
            criteria: Criteria::default(),
            checks: None,
        }
    }

    fn scored(score: u8, flags: &[&str]) -> RunEntry {
        let resp = LlmResponse {
            text: "x".into(),
            ..Default::default()
        };
        let auto = AutoChecks {
            flags: flags.iter().map(|f| f.to_string()).collect(),
            ..Default::default()
        };
        let mut e = RunEntry::completed("t".into(), "api".into(), &resp, 1.234, auto, None);
        e.judge_score = Some(score);
        e
    }

    #[test]
    fn comparison_tables_round_for_display() {
        let prompts = vec![prompt("A", "coding"), prompt("B", "writing")];
        let mut l = ModelLedger::new("gpt", "t0");
        l.append("A", scored(5, &[]));
        l.append("B", scored(4, &["TOO_LONG"]));
        let ledgers = BTreeMap::from([("gpt".to_string(), l)]);

        let text = render_comparison(&aggregate(&ledgers, &prompts));
        assert!(text.contains("Leaderboard (2 prompts, 1 models)"));
        assert!(text.contains("4.50"));
        assert!(text.contains("2/2"));
        assert!(text.contains("coding"));
        assert!(text.contains("B (sub)"));
        assert!(text.contains("gpt: TOO_LONG"));
    }

    #[test]
    fn empty_comparison_has_hint() {
        let text = render_comparison(&aggregate(&BTreeMap::new(), &[]));
        assert!(text.starts_with("No results yet"));
    }

    #[test]
    fn outcome_line_variants() {
        let p = prompt("A", "c");
        let ok = scored(3, &["REFUSAL"]);
        let line = outcome_line(&PromptOutcome {
            index: 1,
            total: 2,
            prompt: &p,
            entry: &ok,
        });
        assert_eq!(line, "[1/2] A  3/5  1.23s  [REFUSAL]");

        let failed = RunEntry::failed("t".into(), "api".into(), 0.5, "boom".into(), None);
        let line = outcome_line(&PromptOutcome {
            index: 2,
            total: 2,
            prompt: &p,
            entry: &failed,
        });
        assert_eq!(line, "[2/2] A  ERROR (0.50s): boom");
    }

    #[test]
    fn models_listing_marks_unrun_and_unknown() {
        let summaries = vec![LedgerSummary {
            model_name: "old".into(),
            prompts: 3,
            scored: 2,
            last_update: "t".into(),
        }];
        let text = render_models(&["new".to_string()], &summaries);
        assert!(text.contains("new") && text.contains("not run"));
        assert!(text.contains("(not in config)"));
    }

    #[test]
    fn prompts_listing_collapses_whitespace() {
        let text = render_prompts(&[prompt("A", "coding")]);
        assert!(text.contains("Explain the thing"));
        assert!(text.ends_with("1 prompts\n"));
    }

    #[test]
    fn truncate_is_char_safe() {
        assert_eq!(truncate("ééééé", 4), "é...");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
