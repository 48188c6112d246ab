//! Quality checks and verdict aggregation.
//!
//! Each check evaluates against the store (never against rows the engine
//! happens to hold in memory) and always appends exactly one durable result
//! row, PASS or FAIL. The verdict is then derived by re-querying the FAIL
//! count from the validation log rather than trusting the in-memory
//! outcomes, so a crash between evaluation and aggregation can never
//! misreport a run as clean.

use anyhow::Result;
use chrono::Utc;
use floodgate_store::Store;
use floodgate_types::{CheckResultEntry, CheckSpec, CheckStatus, RelationRef, RunId};
use serde::Serialize;
use tracing::{info, warn};

/// Aggregated verdict for one validation pass.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Verdict {
    pub failed_checks: i64,
}

impl Verdict {
    #[must_use]
    pub fn passed(self) -> bool {
        self.failed_checks == 0
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.passed() {
            write!(f, "VALIDATION PASSED: All checks passed")
        } else {
            write!(
                f,
                "VALIDATION FAILED: {} checks failed",
                self.failed_checks
            )
        }
    }
}

/// Outcome of evaluating a single check, before it is logged.
struct Evaluation {
    status: CheckStatus,
    expected_value: String,
    actual_value: String,
    message: String,
}

/// Run every check against `relation`, append one result row per check,
/// then aggregate the verdict from the validation log.
///
/// # Errors
///
/// Returns an error on store failure; a failing check is a FAIL result,
/// never an error.
pub fn run_checks(
    store: &dyn Store,
    run_id: &RunId,
    relation: &RelationRef,
    checks: &[CheckSpec],
) -> Result<Verdict> {
    for check in checks {
        let evaluation = evaluate(store, relation, check)?;
        let entry = CheckResultEntry {
            run_id: run_id.clone(),
            table_name: relation.qualified(),
            check_name: check.check_name(),
            check_type: check.check_type().to_string(),
            status: evaluation.status,
            expected_value: evaluation.expected_value,
            actual_value: evaluation.actual_value,
            message: evaluation.message.clone(),
            created_at: Utc::now().to_rfc3339(),
        };
        store.append_check_result(&entry)?;
        match evaluation.status {
            CheckStatus::Pass => {
                info!(check = %entry.check_name, table = %relation, "check passed");
            }
            CheckStatus::Fail => {
                warn!(check = %entry.check_name, table = %relation, message = %evaluation.message, "check failed");
            }
        }
    }

    // The log is the source of truth, not the loop above.
    let failed_checks = store.count_failed_checks(run_id, &relation.qualified())?;
    Ok(Verdict { failed_checks })
}

fn evaluate(store: &dyn Store, relation: &RelationRef, check: &CheckSpec) -> Result<Evaluation> {
    match check {
        CheckSpec::RowCount { min_rows, max_rows } => {
            let count = store.count_rows(relation)?;
            Ok(evaluate_row_count(count, *min_rows, *max_rows))
        }
        CheckSpec::NullPercent {
            column,
            max_percent,
        } => {
            let total = store.count_rows(relation)?;
            if total == 0 {
                // An empty relation is a FAIL result, not a divide-by-zero.
                return Ok(Evaluation {
                    status: CheckStatus::Fail,
                    expected_value: format!("<= {max_percent}%"),
                    actual_value: "n/a".to_string(),
                    message: format!("no rows to evaluate null percentage of '{column}'"),
                });
            }
            let nulls = store.count_nulls(relation, column)?;
            Ok(evaluate_null_percent(column, nulls, total, *max_percent))
        }
        CheckSpec::Freshness {
            column,
            max_age_hours,
        } => {
            let oldest = store.min_timestamp(relation, column)?;
            let age_hours = oldest.map(|ts| {
                let elapsed = Utc::now().signed_duration_since(ts);
                #[allow(clippy::cast_precision_loss)]
                let hours = elapsed.num_seconds() as f64 / 3600.0;
                hours
            });
            Ok(evaluate_freshness(column, age_hours, *max_age_hours))
        }
    }
}

fn evaluate_row_count(count: i64, min_rows: u64, max_rows: Option<u64>) -> Evaluation {
    let expected_value = match max_rows {
        Some(max) => format!("{min_rows}..={max}"),
        None => format!(">= {min_rows}"),
    };
    let actual_value = count.to_string();

    let below_min = count < i64::try_from(min_rows).unwrap_or(i64::MAX);
    let above_max =
        max_rows.is_some_and(|max| count > i64::try_from(max).unwrap_or(i64::MAX));

    let (status, message) = if below_min {
        (
            CheckStatus::Fail,
            format!("row count {count} below minimum {min_rows}"),
        )
    } else if above_max {
        let max = max_rows.unwrap_or_default();
        (
            CheckStatus::Fail,
            format!("row count {count} above maximum {max}"),
        )
    } else {
        (
            CheckStatus::Pass,
            format!("row count {count} within bounds"),
        )
    };

    Evaluation {
        status,
        expected_value,
        actual_value,
        message,
    }
}

#[allow(clippy::cast_precision_loss)]
fn evaluate_null_percent(column: &str, nulls: i64, total: i64, max_percent: f64) -> Evaluation {
    let percent = nulls as f64 * 100.0 / total as f64;
    let status = if percent > max_percent {
        CheckStatus::Fail
    } else {
        CheckStatus::Pass
    };
    Evaluation {
        status,
        expected_value: format!("<= {max_percent}%"),
        actual_value: format!("{percent:.2}%"),
        message: format!("{nulls} of {total} rows have null '{column}' ({percent:.2}%)"),
    }
}

fn evaluate_freshness(column: &str, age_hours: Option<f64>, max_age_hours: f64) -> Evaluation {
    let expected_value = format!("<= {max_age_hours} hours");
    match age_hours {
        None => Evaluation {
            status: CheckStatus::Fail,
            expected_value,
            actual_value: "n/a".to_string(),
            message: format!("no records found with a timestamp in '{column}'"),
        },
        Some(age) => {
            let status = if age > max_age_hours {
                CheckStatus::Fail
            } else {
                CheckStatus::Pass
            };
            Evaluation {
                status,
                expected_value,
                actual_value: format!("{age:.1} hours"),
                message: format!("oldest record is {age:.1} hours old (max {max_age_hours})"),
            }
        }
    }
}
