use std::path::Path;

use anyhow::Result;

use floodgate_engine::orchestrator;

use crate::commands::{load, print_summary};

/// Execute the `run` command: parse, validate, and run the full pipeline.
///
/// Exits non-zero when a stage halts the run or the quality verdict fails.
pub fn execute(pipeline_path: &Path, json: bool) -> Result<()> {
    let (config, store) = load(pipeline_path)?;

    tracing::info!(
        pipeline = config.pipeline,
        raw = %config.tables.raw,
        cleaned = %config.tables.cleaned,
        final_tier = %config.tables.final_tier,
        checks = config.checks.len(),
        "Pipeline validated"
    );

    let summary = orchestrator::run_pipeline(&store, &config)?;

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
