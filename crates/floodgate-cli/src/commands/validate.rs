use std::path::Path;

use anyhow::Result;

use floodgate_engine::orchestrator;

use crate::commands::{load, print_summary};

/// Execute the `validate` command: run only the quality checks against the
/// final tier, under a fresh `VAL_` run id.
pub fn execute(pipeline_path: &Path, json: bool) -> Result<()> {
    let (config, store) = load(pipeline_path)?;

    let summary = orchestrator::run_validation_only(&store, &config)?;

    if json {
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        print_summary(&summary);
    }

    if let Some(verdict) = summary.verdict {
        if !verdict.passed() {
            anyhow::bail!("{verdict}");
        }
    }
    Ok(())
}
