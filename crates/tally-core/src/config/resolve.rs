use super::{Config, ModelConfig};
use crate::errors::{closest_match, ConfigError};
use crate::model::CompletionParams;

/// The evaluated model and (optional) judge picked out of a config.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTargets {
    pub model_name: String,
    pub model: ModelConfig,
    pub judge: Option<ResolvedJudge>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedJudge {
    pub name: String,
    pub model: ModelConfig,
    pub params: CompletionParams,
}

pub fn resolve_targets(cfg: &Config, model_name: &str) -> Result<ResolvedTargets, ConfigError> {
    let model = lookup(cfg, model_name).ok_or_else(|| ConfigError::UnknownModel {
        name: model_name.to_string(),
        available: cfg.models.keys().cloned().collect(),
        hint: closest_match(model_name, cfg.models.keys()),
    })?;

    let judge = match cfg.judge.as_ref().and_then(|j| j.model.as_deref().map(|m| (j, m))) {
        None => None,
        Some((_, judge_name)) if judge_name == model_name => {
            return Err(ConfigError::JudgeIsEvalModel(judge_name.to_string()));
        }
        Some((settings, judge_name)) => {
            let judge_model =
                lookup(cfg, judge_name).ok_or_else(|| ConfigError::UnknownJudgeModel {
                    name: judge_name.to_string(),
                    hint: closest_match(judge_name, cfg.models.keys()),
                })?;
            Some(ResolvedJudge {
                name: judge_name.to_string(),
                model: judge_model.clone(),
                params: settings.params.clone(),
            })
        }
    };

    Ok(ResolvedTargets {
        model_name: model_name.to_string(),
        model: model.clone(),
        judge,
    })
}

fn lookup<'a>(cfg: &'a Config, name: &str) -> Option<&'a ModelConfig> {
    cfg.models.get(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use std::path::Path;

    fn cfg(judge: &str) -> Config {
        let raw = format!(
            r#"
models:
  alpha: {{ provider: fake, model: alpha-1 }}
  beta: {{ provider: fake, model: beta-1 }}
{}
"#,
            judge
        );
        parse_config(&raw, Path::new("config.yaml"), true).unwrap()
    }

    #[test]
    fn resolves_model_and_judge() {
        let t = resolve_targets(&cfg("judge: { model: beta }"), "alpha").unwrap();
        assert_eq!(t.model.model, "alpha-1");
        assert_eq!(t.judge.unwrap().model.model, "beta-1");
    }

    #[test]
    fn no_judge_section_means_no_judge() {
        let t = resolve_targets(&cfg(""), "alpha").unwrap();
        assert!(t.judge.is_none());
    }

    #[test]
    fn judge_equal_to_eval_model_is_fatal() {
        let err = resolve_targets(&cfg("judge: { model: alpha }"), "alpha").unwrap_err();
        assert!(matches!(err, ConfigError::JudgeIsEvalModel(_)));
    }

    #[test]
    fn unknown_models_are_fatal_with_hint() {
        let err = resolve_targets(&cfg(""), "alpah").unwrap_err();
        match err {
            ConfigError::UnknownModel { hint, .. } => assert_eq!(hint.as_deref(), Some("alpha")),
            other => panic!("unexpected: {other}"),
        }

        let err = resolve_targets(&cfg("judge: { model: gamma }"), "alpha").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownJudgeModel { .. }));
    }
}
