//! Stage execution: the log-then-transform-then-finalize contract.
//!
//! Every data stage follows the same shape: insert an IN_PROGRESS execution
//! log row, read the source relation, run the transform, overwrite the
//! target relation, then apply exactly one terminal update (SUCCESS or
//! FAILED) to the log row. The terminal update happens on the failure path
//! too, so an aborted run is still fully accounted for in `pipeline_logs`.

use std::time::Instant;

use floodgate_store::Store;
use floodgate_types::{
    CleanSpec, DedupeSpec, DeriveSpec, RelationRef, RunId, StageStatus, Table,
};
use serde::Serialize;
use tracing::{error, info};

use crate::error::{PipelineError, Result};
use crate::transform::{clean_rows, dedupe_rows, derive_rows, TransformOutcome};

/// The transform a data stage applies.
#[derive(Debug, Clone, Copy)]
pub enum StageOp<'a> {
    Clean(&'a CleanSpec),
    Dedupe(&'a DedupeSpec),
    Derive(&'a DeriveSpec),
}

impl StageOp<'_> {
    fn apply(self, table: &Table) -> anyhow::Result<TransformOutcome> {
        match self {
            Self::Clean(spec) => clean_rows(table, spec),
            Self::Dedupe(spec) => dedupe_rows(table, spec),
            Self::Derive(spec) => derive_rows(table, spec),
        }
    }
}

/// Per-stage accounting included in the run summary.
#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
    pub stage: String,
    pub status: StageStatus,
    pub rows_processed: u64,
    pub rows_failed: u64,
    pub execution_time_seconds: f64,
}

/// Run one data stage from `source` into `target`.
///
/// On success the target relation holds the transformed rows and the log
/// row is SUCCESS with `rows_processed` re-counted from the target. On
/// transform or store failure the log row is finalized as FAILED with the
/// error message and a [`PipelineError::Stage`] is returned.
///
/// # Errors
///
/// Returns [`PipelineError::Stage`] when the stage itself fails, or
/// [`PipelineError::Infrastructure`] when the log row can't even be opened.
pub fn run_stage(
    store: &dyn Store,
    stage: &str,
    run_id: &RunId,
    source: &RelationRef,
    target: &RelationRef,
    op: StageOp<'_>,
) -> Result<StageReport> {
    store.begin_stage(stage, run_id)?;
    info!(stage, run_id = %run_id, source = %source, target = %target, "stage started");
    let started = Instant::now();

    match execute(store, source, target, op) {
        Ok((rows_processed, rows_failed)) => {
            let elapsed = started.elapsed().as_secs_f64();
            store.finish_stage(
                stage,
                run_id,
                StageStatus::Success,
                rows_processed,
                rows_failed,
                elapsed,
                None,
            )?;
            info!(stage, run_id = %run_id, rows_processed, rows_failed, "stage succeeded");
            Ok(StageReport {
                stage: stage.to_string(),
                status: StageStatus::Success,
                rows_processed,
                rows_failed,
                execution_time_seconds: elapsed,
            })
        }
        Err(err) => {
            let elapsed = started.elapsed().as_secs_f64();
            let message = format!("{err:#}");
            if let Err(log_err) = store.finish_stage(
                stage,
                run_id,
                StageStatus::Failed,
                0,
                0,
                elapsed,
                Some(&message),
            ) {
                error!(stage, run_id = %run_id, error = %log_err, "failed to finalize log row");
            }
            error!(stage, run_id = %run_id, error = %message, "stage failed");
            Err(PipelineError::Stage {
                stage: stage.to_string(),
                run_id: run_id.clone(),
                message,
            })
        }
    }
}

fn execute(
    store: &dyn Store,
    source: &RelationRef,
    target: &RelationRef,
    op: StageOp<'_>,
) -> anyhow::Result<(u64, u64)> {
    let table = store.read_rows(source)?;
    let outcome = op.apply(&table)?;
    store.replace_rows(target, &outcome.table.columns, &outcome.table.rows)?;
    // Re-count from the store so the log reflects what actually landed.
    let rows_processed = u64::try_from(store.count_rows(target)?).unwrap_or_default();
    Ok((rows_processed, outcome.rows_failed))
}
