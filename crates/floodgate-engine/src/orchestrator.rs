//! Sequential pipeline orchestration.
//!
//! A run executes the fixed stage sequence CLEAN_RAW_DATA,
//! REMOVE_DUPLICATES, APPLY_BUSINESS_TRANSFORMS, VALIDATION under a single
//! run id. Stages run strictly one after another; the first failure halts
//! the run and nothing is rolled back, so a partially completed run leaves
//! its earlier stage output in place for inspection and re-running. A
//! failing quality verdict is not a halt: the VALIDATION log row is
//! finalized as FAILED but the run itself completes and reports the
//! verdict.

use std::time::Instant;

use floodgate_store::Store;
use floodgate_types::{CheckSpec, RelationRef, RunId, StageStatus};
use serde::Serialize;
use tracing::{error, info};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::run_id::{self, RUN_PREFIX, VALIDATION_PREFIX};
use crate::stage::{run_stage, StageOp, StageReport};
use crate::validation::{run_checks, Verdict};

pub const STAGE_CLEAN: &str = "CLEAN_RAW_DATA";
pub const STAGE_DEDUPE: &str = "REMOVE_DUPLICATES";
pub const STAGE_TRANSFORM: &str = "APPLY_BUSINESS_TRANSFORMS";
pub const STAGE_VALIDATION: &str = "VALIDATION";

/// Final accounting for a completed run.
#[derive(Debug, Serialize)]
pub struct PipelineSummary {
    pub run_id: RunId,
    pub stages: Vec<StageReport>,
    /// Unset only when the run had no checks configured.
    pub verdict: Option<Verdict>,
    pub message: String,
}

/// Execute a full pipeline run: three data stages, then validation.
///
/// Returns `Ok` with the summary when every stage completed, including runs
/// whose quality verdict failed; callers decide what a failed verdict means
/// for them. Returns `Err` when a stage halted the run.
///
/// # Errors
///
/// Returns [`PipelineError::Stage`] for the stage that halted the run, or
/// [`PipelineError::Infrastructure`] for failures outside stage accounting.
pub fn run_pipeline(store: &dyn Store, config: &PipelineConfig) -> Result<PipelineSummary> {
    let run_id = run_id::generate(RUN_PREFIX);
    info!(pipeline = %config.pipeline, run_id = %run_id, "pipeline run started");

    let tables = &config.tables;
    let mut stages = Vec::with_capacity(4);

    stages.push(run_stage(
        store,
        STAGE_CLEAN,
        &run_id,
        &tables.raw,
        &tables.cleaned,
        StageOp::Clean(&config.clean),
    )?);
    // Dedupe rewrites the cleaned tier in place.
    stages.push(run_stage(
        store,
        STAGE_DEDUPE,
        &run_id,
        &tables.cleaned,
        &tables.cleaned,
        StageOp::Dedupe(&config.dedupe),
    )?);
    stages.push(run_stage(
        store,
        STAGE_TRANSFORM,
        &run_id,
        &tables.cleaned,
        &tables.final_tier,
        StageOp::Derive(&config.derive),
    )?);

    let (report, verdict) =
        run_validation_stage(store, &run_id, &tables.final_tier, &config.checks)?;
    stages.push(report);

    let message = if verdict.map_or(true, Verdict::passed) {
        format!("Run {run_id} completed successfully")
    } else {
        format!("Run {run_id} completed with validation failures")
    };
    info!(pipeline = %config.pipeline, run_id = %run_id, "{message}");

    Ok(PipelineSummary {
        run_id,
        stages,
        verdict,
        message,
    })
}

/// Execute the validation stage alone, under a fresh `VAL_` run id.
///
/// # Errors
///
/// Returns [`PipelineError::Stage`] if check evaluation itself failed.
pub fn run_validation_only(store: &dyn Store, config: &PipelineConfig) -> Result<PipelineSummary> {
    let run_id = run_id::generate(VALIDATION_PREFIX);
    info!(pipeline = %config.pipeline, run_id = %run_id, "validation-only run started");

    let (report, verdict) =
        run_validation_stage(store, &run_id, &config.tables.final_tier, &config.checks)?;

    let message = if verdict.map_or(true, Verdict::passed) {
        format!("Validation run {run_id} passed")
    } else {
        format!("Validation run {run_id} failed")
    };

    Ok(PipelineSummary {
        run_id,
        stages: vec![report],
        verdict,
        message,
    })
}

/// Run the checks under their own execution log row.
///
/// The VALIDATION row mirrors data stages: IN_PROGRESS up front, one
/// terminal update after. A failing verdict finalizes the row as FAILED
/// with the fail count, while earlier stage rows keep their own statuses.
#[allow(clippy::cast_possible_truncation)]
fn run_validation_stage(
    store: &dyn Store,
    run_id: &RunId,
    relation: &RelationRef,
    checks: &[CheckSpec],
) -> Result<(StageReport, Option<Verdict>)> {
    store.begin_stage(STAGE_VALIDATION, run_id)?;
    let started = Instant::now();

    if checks.is_empty() {
        let elapsed = started.elapsed().as_secs_f64();
        store.finish_stage(STAGE_VALIDATION, run_id, StageStatus::Success, 0, 0, elapsed, None)?;
        info!(run_id = %run_id, "no checks configured, skipping validation");
        return Ok((
            StageReport {
                stage: STAGE_VALIDATION.to_string(),
                status: StageStatus::Success,
                rows_processed: 0,
                rows_failed: 0,
                execution_time_seconds: elapsed,
            },
            None,
        ));
    }

    match run_checks(store, run_id, relation, checks) {
        Ok(verdict) => {
            let elapsed = started.elapsed().as_secs_f64();
            let checks_run = checks.len() as u64;
            let failed = u64::try_from(verdict.failed_checks).unwrap_or_default();
            let (status, message) = if verdict.passed() {
                (StageStatus::Success, None)
            } else {
                (
                    StageStatus::Failed,
                    Some(format!("{failed} validation checks failed")),
                )
            };
            store.finish_stage(
                STAGE_VALIDATION,
                run_id,
                status,
                checks_run,
                failed,
                elapsed,
                message.as_deref(),
            )?;
            Ok((
                StageReport {
                    stage: STAGE_VALIDATION.to_string(),
                    status,
                    rows_processed: checks_run,
                    rows_failed: failed,
                    execution_time_seconds: elapsed,
                },
                Some(verdict),
            ))
        }
        Err(err) => {
            let elapsed = started.elapsed().as_secs_f64();
            let message = format!("{err:#}");
            if let Err(log_err) = store.finish_stage(
                STAGE_VALIDATION,
                run_id,
                StageStatus::Failed,
                0,
                0,
                elapsed,
                Some(&message),
            ) {
                error!(run_id = %run_id, error = %log_err, "failed to finalize log row");
            }
            error!(run_id = %run_id, error = %message, "validation stage failed");
            Err(PipelineError::Stage {
                stage: STAGE_VALIDATION.to_string(),
                run_id: run_id.clone(),
                message,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parser::parse_pipeline_str;
    use chrono::Utc;
    use floodgate_store::SqliteStore;
    use floodgate_types::{Row, Value};

    const CONFIG: &str = r"
pipeline: customer_orders
store:
  path: ':memory:'
tables:
  raw: RAW.STAGING_DATA
  cleaned: CLEANED.CLEANED_DATA
  final: ANALYTICS.FINAL_DATA
clean:
  key_columns: [order_id]
dedupe:
  key_columns: [order_id]
  order_column: processed_at
checks:
  - type: row_count
    min_rows: 1
  - type: freshness
    column: processed_at
    max_age_hours: 24
";

    fn seed_raw(store: &SqliteStore, rows: &[(Option<&str>, String)]) {
        let relation = RelationRef::parse("RAW.STAGING_DATA").unwrap();
        let columns = vec!["order_id".to_string(), "processed_at".to_string()];
        let rows: Vec<Row> = rows
            .iter()
            .map(|(id, ts)| {
                let mut row = Row::new();
                row.set(
                    "order_id",
                    id.map_or(Value::Null, |s| Value::Text(s.into())),
                );
                row.set("processed_at", Value::Text(ts.clone()));
                row
            })
            .collect();
        store.replace_rows(&relation, &columns, &rows).unwrap();
    }

    #[test]
    fn full_run_logs_all_four_stages() {
        let store = SqliteStore::in_memory().unwrap();
        let config = parse_pipeline_str(CONFIG).unwrap();
        let fresh = Utc::now().to_rfc3339();
        seed_raw(
            &store,
            &[
                (Some("1"), fresh.clone()),
                (Some("1"), fresh.clone()),
                (None, fresh),
            ],
        );

        let summary = run_pipeline(&store, &config).unwrap();
        assert!(summary.run_id.as_str().starts_with("RUN_"));
        assert_eq!(summary.stages.len(), 4);
        assert!(summary.verdict.unwrap().passed());

        let log = store.stage_log(&summary.run_id).unwrap();
        let names: Vec<&str> = log.iter().map(|e| e.pipeline_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                STAGE_CLEAN,
                STAGE_DEDUPE,
                STAGE_TRANSFORM,
                STAGE_VALIDATION
            ]
        );
        assert!(log.iter().all(|e| e.status == StageStatus::Success));

        // 3 raw rows, 1 dropped for null key, 1 removed as duplicate.
        assert_eq!(log[0].rows_processed, 2);
        assert_eq!(log[0].rows_failed, 1);
        assert_eq!(log[1].rows_processed, 1);
    }

    #[test]
    fn failed_stage_halts_and_skips_later_stages() {
        let store = SqliteStore::in_memory().unwrap();
        let config = parse_pipeline_str(CONFIG).unwrap();
        // RAW.STAGING_DATA never created: the clean stage fails.

        let err = run_pipeline(&store, &config).unwrap_err();
        let run_id = match err {
            PipelineError::Stage { stage, run_id, .. } => {
                assert_eq!(stage, STAGE_CLEAN);
                run_id
            }
            other => panic!("expected stage error, got {other}"),
        };

        let log = store.stage_log(&run_id).unwrap();
        assert_eq!(log.len(), 1, "later stages must not have log rows");
        assert_eq!(log[0].status, StageStatus::Failed);
    }

    #[test]
    fn failing_verdict_completes_run_with_failed_validation_row() {
        let store = SqliteStore::in_memory().unwrap();
        let config = parse_pipeline_str(CONFIG).unwrap();
        let stale = (Utc::now() - chrono::Duration::hours(30)).to_rfc3339();
        seed_raw(&store, &[(Some("1"), stale)]);

        let summary = run_pipeline(&store, &config).unwrap();
        let verdict = summary.verdict.unwrap();
        assert!(!verdict.passed());
        assert_eq!(verdict.failed_checks, 1);
        assert!(summary.message.contains("validation failures"));

        let log = store.stage_log(&summary.run_id).unwrap();
        assert_eq!(log.len(), 4);
        // Data stages keep SUCCESS; only the validation row flips.
        assert!(log[..3].iter().all(|e| e.status == StageStatus::Success));
        assert_eq!(log[3].status, StageStatus::Failed);
        assert_eq!(
            log[3].error_message.as_deref(),
            Some("1 validation checks failed")
        );
    }

    #[test]
    fn validation_only_uses_val_prefix_and_single_stage() {
        let store = SqliteStore::in_memory().unwrap();
        let config = parse_pipeline_str(CONFIG).unwrap();
        let relation = RelationRef::parse("ANALYTICS.FINAL_DATA").unwrap();
        let columns = vec!["order_id".to_string(), "processed_at".to_string()];
        let mut row = Row::new();
        row.set("order_id", Value::Text("1".into()));
        row.set("processed_at", Value::Text(Utc::now().to_rfc3339()));
        store.replace_rows(&relation, &columns, &[row]).unwrap();

        let summary = run_validation_only(&store, &config).unwrap();
        assert!(summary.run_id.as_str().starts_with("VAL_"));
        assert_eq!(summary.stages.len(), 1);
        assert_eq!(summary.stages[0].stage, STAGE_VALIDATION);
        assert!(summary.verdict.unwrap().passed());

        let results = store
            .check_results(&summary.run_id, "ANALYTICS.FINAL_DATA")
            .unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn no_checks_means_no_verdict() {
        let store = SqliteStore::in_memory().unwrap();
        let mut config = parse_pipeline_str(CONFIG).unwrap();
        config.checks.clear();
        let fresh = Utc::now().to_rfc3339();
        seed_raw(&store, &[(Some("1"), fresh)]);

        let summary = run_pipeline(&store, &config).unwrap();
        assert!(summary.verdict.is_none());
        assert!(summary.message.contains("completed successfully"));

        let log = store.stage_log(&summary.run_id).unwrap();
        assert_eq!(log[3].status, StageStatus::Success);
    }
}
