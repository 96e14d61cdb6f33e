use crate::aggregate::Comparison;
use anyhow::Context;
use std::path::Path;

/// Writes the comparison as pretty JSON, creating parent directories.
pub fn write_json(comparison: &Comparison, out: &Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let v = serde_json::json!({
        "generated_by": concat!("tally ", env!("CARGO_PKG_VERSION")),
        "total_prompts": comparison.total_prompts,
        "total_models": comparison.total_models,
        "categories": comparison.categories,
        "leaderboard": comparison.leaderboard,
        "flags": comparison.flags,
    });
    std::fs::write(out, serde_json::to_string_pretty(&v)?)
        .with_context(|| format!("failed to write {}", out.display()))?;
    Ok(())
}
