pub mod run;
pub mod status;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use floodgate_engine::config::{parser, validator, PipelineConfig};
use floodgate_engine::PipelineSummary;
use floodgate_store::SqliteStore;

/// Parse and validate the pipeline file, then open its store.
pub fn load(pipeline_path: &Path) -> Result<(PipelineConfig, SqliteStore)> {
    let config = parser::parse_pipeline(pipeline_path)
        .with_context(|| format!("Failed to parse pipeline: {}", pipeline_path.display()))?;
    validator::validate_pipeline(&config)?;
    let store = SqliteStore::open(&config.store.path)
        .with_context(|| format!("Failed to open store: {}", config.store.path.display()))?;
    Ok((config, store))
}

/// Print a run summary in the human format.
pub fn print_summary(summary: &PipelineSummary) {
    println!("{}", summary.message);
    for stage in &summary.stages {
        println!(
            "  {:26} {:8} rows={} failed={} ({:.2}s)",
            stage.stage,
            stage.status.as_str(),
            stage.rows_processed,
            stage.rows_failed,
            stage.execution_time_seconds,
        );
    }
    if let Some(verdict) = &summary.verdict {
        println!("  {verdict}");
    }
}
