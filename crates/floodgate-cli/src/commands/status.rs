use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use floodgate_store::Store;
use floodgate_types::{CheckResultEntry, RunId, StageLogEntry};

use crate::commands::load;

#[derive(Serialize)]
struct RunStatus {
    run_id: RunId,
    stages: Vec<StageLogEntry>,
    checks: Vec<CheckResultEntry>,
}

/// Execute the `status` command: print the execution log rows and check
/// results recorded for a past run.
pub fn execute(pipeline_path: &Path, run_id: &str, json: bool) -> Result<()> {
    let (config, store) = load(pipeline_path)?;

    let run_id = RunId::new(run_id);
    let stages = store.stage_log(&run_id)?;
    if stages.is_empty() {
        anyhow::bail!("No execution log rows found for run {run_id}");
    }
    let checks = store.check_results(&run_id, &config.tables.final_tier.qualified())?;

    let status = RunStatus {
        run_id,
        stages,
        checks,
    };

    if json {
        println!("{}", serde_json::to_string(&status)?);
        return Ok(());
    }

    println!("Run {}", status.run_id);
    for entry in &status.stages {
        let duration = entry
            .execution_time_seconds
            .map_or_else(|| "-".to_string(), |secs| format!("{secs:.2}s"));
        println!(
            "  {:26} {:11} rows={} failed={} started={} ({duration})",
            entry.pipeline_name,
            entry.status.as_str(),
            entry.rows_processed,
            entry.rows_failed,
            entry.start_time,
        );
        if let Some(message) = &entry.error_message {
            println!("    error: {message}");
        }
    }

    if !status.checks.is_empty() {
        println!("Checks against {}", config.tables.final_tier);
        for check in &status.checks {
            println!(
                "  {:30} {:4} expected {} got {}",
                check.check_name,
                check.status.as_str(),
                check.expected_value,
                check.actual_value,
            );
        }
    }
    Ok(())
}
