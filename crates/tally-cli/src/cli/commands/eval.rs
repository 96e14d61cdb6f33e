use super::{exit_codes, ledger_store, load_prompts};
use crate::cli::args::{EvalArgs, GlobalArgs};
use std::time::Duration;
use tally_core::config::load_config;
use tally_core::config::resolve::resolve_targets;
use tally_core::engine::Evaluator;
use tally_core::judge::JudgeService;
use tally_core::ledger::plan_batch;
use tally_core::providers::llm::build_client;
use tally_core::report::console;

pub async fn run(global: &GlobalArgs, args: EvalArgs) -> anyhow::Result<i32> {
    // Everything that can be misconfigured is checked before the ledger is opened.
    let cfg = load_config(&global.config, global.strict_config)?;
    let targets = resolve_targets(&cfg, &args.model)?;
    let client = build_client(&targets.model_name, &targets.model)?;
    let judge = match &targets.judge {
        Some(j) => Some(JudgeService::new(
            j.name.clone(),
            build_client(&j.name, &j.model)?,
            j.params.clone(),
        )),
        None => {
            tracing::warn!(event = "judge.disabled", "no judge model configured; runs stay unscored");
            None
        }
    };
    let delay = Duration::try_from_secs_f64(cfg.eval.delay_between_calls).map_err(|_| {
        anyhow::anyhow!(
            "eval.delay_between_calls must be a non-negative number of seconds, got {}",
            cfg.eval.delay_between_calls
        )
    })?;
    let prompts = load_prompts(global, &args.filter)?;

    let (store, clock) = ledger_store(global);
    let mut ledger = store.load(&targets.model_name)?;
    let plan = plan_batch(&ledger, &prompts, args.rerun);

    if plan.is_empty() {
        eprintln!(
            "{}: all {} selected prompts already have results (use --rerun to run them again)",
            targets.model_name,
            plan.already_done.len()
        );
        return Ok(exit_codes::OK);
    }

    eprintln!(
        "Evaluating {} ({}) on {} prompts, judge: {}",
        targets.model_name,
        targets.model.model,
        plan.to_run.len(),
        judge.as_ref().map(|j| j.name()).unwrap_or("none")
    );

    let evaluator = Evaluator {
        store: store.clone(),
        client,
        api_model: targets.model.model.clone(),
        params: targets.model.params.clone(),
        checker: tally_checks::default_checker(),
        judge,
        clock,
        delay,
    };

    let summary = evaluator
        .run_batch(&mut ledger, &plan.to_run, |outcome| {
            eprintln!("  {}", console::outcome_line(&outcome));
        })
        .await?;

    eprintln!(
        "\n{}",
        console::render_batch_summary(&targets.model_name, &summary, plan.already_done.len())
    );
    eprintln!("saved {}", store.path_for(&targets.model_name)?.display());
    Ok(exit_codes::OK)
}
