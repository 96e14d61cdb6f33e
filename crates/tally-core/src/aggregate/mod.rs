//! Leaderboard statistics derived from ledgers.
//!
//! Everything here is a pure function of the ledgers and the prompt list it
//! is given. Only the latest run per prompt counts. Values are left
//! unrounded; formatting belongs to the report layer.

pub mod stats;

use crate::ledger::ModelLedger;
use crate::model::{PromptSpec, RunEntry};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

pub const SCORE_LEVELS: std::ops::RangeInclusive<u8> = 1..=5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardRow {
    pub name: String,
    pub avg_score: f64,
    pub scored: usize,
    pub total: usize,
    pub errors: usize,
    pub flagged: usize,
    pub avg_latency: f64,
    pub median_latency: f64,
    pub avg_tokens: f64,
    pub efficiency: f64,
    /// Every category of the prompt list; `None` where nothing was scored.
    pub cat_scores: BTreeMap<String, Option<f64>>,
    /// Count per judge score level 1..=5.
    pub score_dist: BTreeMap<u8, usize>,
}

impl LeaderboardRow {
    pub fn has_scores(&self) -> bool {
        self.scored > 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptFlags {
    pub id: String,
    pub subcategory: String,
    pub models: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub leaderboard: Vec<LeaderboardRow>,
    pub categories: Vec<String>,
    pub flags: Vec<PromptFlags>,
    pub total_prompts: usize,
    pub total_models: usize,
}

/// Builds the ranked comparison of `ledgers` over `prompts`.
///
/// Rows are ordered by: has any scored prompt, then average score
/// (descending), then model name.
pub fn aggregate(ledgers: &BTreeMap<String, ModelLedger>, prompts: &[PromptSpec]) -> Comparison {
    let categories: Vec<String> = prompts
        .iter()
        .map(|p| p.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut leaderboard: Vec<LeaderboardRow> = ledgers
        .iter()
        .map(|(name, ledger)| {
            let mut acc = ModelAccumulator::new(&categories);
            for p in prompts {
                if let Some(run) = ledger.latest(&p.id) {
                    acc.push(p, run);
                }
            }
            acc.finish(name)
        })
        .collect();

    leaderboard.sort_by(|a, b| {
        b.has_scores()
            .cmp(&a.has_scores())
            .then_with(|| b.avg_score.total_cmp(&a.avg_score))
            .then_with(|| a.name.cmp(&b.name))
    });

    Comparison {
        flags: collect_flags(ledgers, prompts),
        categories,
        leaderboard,
        total_prompts: prompts.len(),
        total_models: ledgers.len(),
    }
}

fn collect_flags(ledgers: &BTreeMap<String, ModelLedger>, prompts: &[PromptSpec]) -> Vec<PromptFlags> {
    prompts
        .iter()
        .filter_map(|p| {
            let models: BTreeMap<String, Vec<String>> = ledgers
                .iter()
                .filter_map(|(name, ledger)| {
                    let run = ledger.latest(&p.id)?;
                    run.auto_checks
                        .is_flagged()
                        .then(|| (name.clone(), run.auto_checks.flags.clone()))
                })
                .collect();
            (!models.is_empty()).then(|| PromptFlags {
                id: p.id.clone(),
                subcategory: p.subcategory.clone(),
                models,
            })
        })
        .collect()
}

struct ModelAccumulator {
    total: usize,
    errors: usize,
    flagged: usize,
    scores: Vec<u8>,
    latencies: Vec<f64>,
    tokens: Vec<f64>,
    by_category: BTreeMap<String, Vec<u8>>,
}

impl ModelAccumulator {
    fn new(categories: &[String]) -> Self {
        Self {
            total: 0,
            errors: 0,
            flagged: 0,
            scores: Vec::new(),
            latencies: Vec::new(),
            tokens: Vec::new(),
            by_category: categories.iter().map(|c| (c.clone(), Vec::new())).collect(),
        }
    }

    fn push(&mut self, prompt: &PromptSpec, run: &RunEntry) {
        self.total += 1;
        if run.is_error() {
            self.errors += 1;
            return;
        }
        if run.auto_checks.is_flagged() {
            self.flagged += 1;
        }
        if let Some(score) = run.judge_score {
            self.scores.push(score);
            self.by_category
                .entry(prompt.category.clone())
                .or_default()
                .push(score);
        }
        self.latencies.push(run.latency_s);
        self.tokens.push(run.output_tokens.unwrap_or(0) as f64);
    }

    fn finish(self, name: &str) -> LeaderboardRow {
        let avg_score = stats::mean(&as_f64(&self.scores));
        let avg_tokens = stats::mean(&self.tokens);

        let cat_scores = self
            .by_category
            .into_iter()
            .map(|(cat, scores)| {
                let avg = (!scores.is_empty()).then(|| stats::mean(&as_f64(&scores)));
                (cat, avg)
            })
            .collect();

        let mut score_dist: BTreeMap<u8, usize> = SCORE_LEVELS.map(|l| (l, 0)).collect();
        for s in &self.scores {
            *score_dist.entry(*s).or_default() += 1;
        }

        LeaderboardRow {
            name: name.to_string(),
            avg_score,
            scored: self.scores.len(),
            total: self.total,
            errors: self.errors,
            flagged: self.flagged,
            avg_latency: stats::mean(&self.latencies),
            median_latency: stats::half_index_median(&self.latencies),
            avg_tokens,
            efficiency: stats::efficiency(avg_score, avg_tokens),
            cat_scores,
            score_dist,
        }
    }
}

fn as_f64(scores: &[u8]) -> Vec<f64> {
    scores.iter().map(|s| f64::from(*s)).collect()
}

/// End-of-batch counts, recomputed from the ledger so they match exactly what
/// was persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub prompts: usize,
    pub flagged: usize,
    pub judged: usize,
    pub errors: usize,
}

impl BatchSummary {
    pub fn from_ledger(ledger: &ModelLedger, prompts: &[PromptSpec]) -> Self {
        let latest: Vec<&RunEntry> = prompts.iter().filter_map(|p| ledger.latest(&p.id)).collect();
        Self {
            prompts: prompts.len(),
            flagged: latest.iter().filter(|r| r.auto_checks.is_flagged()).count(),
            judged: latest.iter().filter(|r| r.judge_score.is_some()).count(),
            errors: latest.iter().filter(|r| r.is_error()).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AutoChecks, Criteria, LlmResponse, Usage};

    fn prompt(id: &str, category: &str) -> PromptSpec {
        PromptSpec {
            id: id.into(),
            category: category.into(),
            subcategory: format!("{category}-sub"),
            difficulty: "easy".into(),
            prompt: "q".into(),
            ideal: String::new(),
            criteria: Criteria::default(),
            checks: None,
        }
    }

    fn ok(score: Option<u8>, latency: f64, tokens: Option<u64>, flags: &[&str]) -> RunEntry {
        let resp = LlmResponse {
            text: "a".into(),
            usage: Usage {
                input_tokens: Some(3),
                output_tokens: tokens,
            },
            ..Default::default()
        };
        let auto = AutoChecks {
            flags: flags.iter().map(|f| f.to_string()).collect(),
            auto_scores: BTreeMap::new(),
            passed: flags.is_empty(),
        };
        let mut e = RunEntry::completed("t".into(), "api".into(), &resp, latency, auto, None);
        e.judge_score = score;
        e
    }

    fn err() -> RunEntry {
        RunEntry::failed("t".into(), "api".into(), 0.2, "timeout".into(), None)
    }

    fn ledgers(items: Vec<(&str, Vec<(&str, RunEntry)>)>) -> BTreeMap<String, ModelLedger> {
        items
            .into_iter()
            .map(|(name, runs)| {
                let mut l = ModelLedger::new(name, "t0");
                for (id, e) in runs {
                    l.append(id, e);
                }
                (name.to_string(), l)
            })
            .collect()
    }

    #[test]
    fn errors_are_counted_but_excluded_from_scores() {
        let prompts = vec![prompt("A", "coding"), prompt("B", "coding")];
        let l = ledgers(vec![(
            "m",
            vec![("A", ok(Some(5), 1.0, Some(10), &[])), ("B", err())],
        )]);

        let cmp = aggregate(&l, &prompts);
        let row = &cmp.leaderboard[0];
        assert_eq!(row.total, 2);
        assert_eq!(row.scored, 1);
        assert_eq!(row.errors, 1);
        assert_eq!(row.flagged, 0);
        assert_eq!(row.avg_score, 5.0);
        assert_eq!(row.avg_latency, 1.0);
        assert_eq!(row.avg_tokens, 10.0);
    }

    #[test]
    fn only_latest_run_counts() {
        let prompts = vec![prompt("A", "coding")];
        let l = ledgers(vec![(
            "m",
            vec![("A", err()), ("A", ok(Some(2), 1.0, None, &[]))],
        )]);
        let row = &aggregate(&l, &prompts).leaderboard[0];
        assert_eq!(row.errors, 0);
        assert_eq!(row.avg_score, 2.0);
        assert_eq!(row.total, 1);
    }

    #[test]
    fn prompts_outside_the_list_are_ignored() {
        let prompts = vec![prompt("A", "coding")];
        let l = ledgers(vec![(
            "m",
            vec![("A", ok(Some(4), 1.0, None, &[])), ("Z", ok(Some(1), 9.0, None, &[]))],
        )]);
        let row = &aggregate(&l, &prompts).leaderboard[0];
        assert_eq!(row.total, 1);
        assert_eq!(row.avg_score, 4.0);
        assert_eq!(row.avg_latency, 1.0);
    }

    #[test]
    fn latency_median_and_token_efficiency() {
        let prompts: Vec<_> = ["A", "B", "C", "D"].iter().map(|id| prompt(id, "c")).collect();
        let l = ledgers(vec![(
            "m",
            vec![
                ("A", ok(Some(4), 3.0, Some(256), &[])),
                ("B", ok(Some(4), 1.0, Some(256), &[])),
                ("C", ok(Some(4), 4.0, None, &[])),
                ("D", ok(Some(4), 2.0, Some(512), &[])),
            ],
        )]);
        let row = &aggregate(&l, &prompts).leaderboard[0];
        assert_eq!(row.median_latency, 3.0);
        assert_eq!(row.avg_latency, 2.5);
        assert_eq!(row.avg_tokens, 256.0);
        assert_eq!(row.efficiency, 0.5);
    }

    #[test]
    fn efficiency_is_zero_without_scores() {
        let prompts = vec![prompt("A", "c")];
        let l = ledgers(vec![("m", vec![("A", ok(None, 1.0, Some(500), &[]))])]);
        let row = &aggregate(&l, &prompts).leaderboard[0];
        assert_eq!(row.scored, 0);
        assert_eq!(row.avg_score, 0.0);
        assert_eq!(row.efficiency, 0.0);
    }

    #[test]
    fn categories_and_distribution() {
        let prompts = vec![
            prompt("A", "coding"),
            prompt("B", "coding"),
            prompt("C", "writing"),
            prompt("D", "safety"),
        ];
        let l = ledgers(vec![(
            "m",
            vec![
                ("A", ok(Some(5), 1.0, None, &[])),
                ("B", ok(Some(2), 1.0, None, &[])),
                ("C", ok(None, 1.0, None, &[])),
            ],
        )]);
        let cmp = aggregate(&l, &prompts);
        assert_eq!(cmp.categories, vec!["coding", "safety", "writing"]);

        let row = &cmp.leaderboard[0];
        assert_eq!(row.cat_scores["coding"], Some(3.5));
        assert_eq!(row.cat_scores["writing"], None);
        assert_eq!(row.cat_scores["safety"], None);
        assert_eq!(row.cat_scores.len(), 3);

        let dist: Vec<usize> = row.score_dist.values().copied().collect();
        assert_eq!(dist, vec![0, 1, 0, 0, 1]);
    }

    #[test]
    fn ranking_puts_unscored_last_and_breaks_ties_by_name() {
        let prompts = vec![prompt("A", "c")];
        let l = ledgers(vec![
            ("zeta", vec![("A", ok(Some(4), 1.0, None, &[]))]),
            ("alpha", vec![("A", ok(Some(4), 1.0, None, &[]))]),
            ("best", vec![("A", ok(Some(5), 1.0, None, &[]))]),
            ("aaa-unscored", vec![("A", err())]),
        ]);
        let names: Vec<String> = aggregate(&l, &prompts)
            .leaderboard
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["best", "alpha", "zeta", "aaa-unscored"]);
    }

    #[test]
    fn flags_are_grouped_per_prompt_in_catalog_order() {
        let prompts = vec![prompt("B", "c"), prompt("A", "c"), prompt("C", "c")];
        let l = ledgers(vec![
            (
                "m1",
                vec![
                    ("A", ok(Some(3), 1.0, None, &["TOO_LONG"])),
                    ("B", err()),
                    ("C", ok(Some(3), 1.0, None, &[])),
                ],
            ),
            ("m2", vec![("A", ok(Some(3), 1.0, None, &["REFUSAL", "MISSING:x"]))]),
        ]);
        let cmp = aggregate(&l, &prompts);
        let ids: Vec<&str> = cmp.flags.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);
        assert_eq!(cmp.flags[0].models["m1"], vec!["API_ERROR"]);
        assert_eq!(cmp.flags[1].models.len(), 2);
        assert_eq!(cmp.flags[1].subcategory, "c-sub");

        // error runs appear in the flag table but are not counted as flagged
        let m1 = cmp.leaderboard.iter().find(|r| r.name == "m1").unwrap();
        assert_eq!(m1.flagged, 1);
        assert_eq!(m1.errors, 1);
    }

    #[test]
    fn aggregation_is_pure() {
        let prompts = vec![prompt("A", "c"), prompt("B", "d")];
        let l = ledgers(vec![
            ("m1", vec![("A", ok(Some(3), 1.3, Some(40), &["TOO_LONG"]))]),
            ("m2", vec![("B", ok(Some(5), 0.7, Some(90), &[])), ("A", err())]),
        ]);
        let first = aggregate(&l, &prompts);
        let second = aggregate(&l, &prompts);
        assert_eq!(first, second);
        assert_eq!(first.total_models, 2);
        assert_eq!(first.total_prompts, 2);
    }

    #[test]
    fn batch_summary_reads_latest_runs() {
        let prompts = vec![prompt("A", "c"), prompt("B", "c"), prompt("C", "c")];
        let mut l = ModelLedger::new("m", "t0");
        l.append("A", ok(None, 1.0, None, &["TOO_LONG"]));
        l.append("A", ok(Some(4), 1.0, None, &[]));
        l.append("B", err());
        l.append("Z", ok(Some(5), 1.0, None, &[]));

        let s = BatchSummary::from_ledger(&l, &prompts);
        assert_eq!(
            s,
            BatchSummary {
                prompts: 3,
                flagged: 1,
                judged: 1,
                errors: 1,
            }
        );
    }
}
