//! Store trait definition.
//!
//! [`Store`] is the storage contract between the engine and the external
//! relational store: the data-plane surface the stages read and write
//! through, plus the two append/update log relations (`pipeline_logs`,
//! `validation_results`) that form the durable audit trail. Model types
//! live in `floodgate_types`.

use chrono::{DateTime, Utc};
use floodgate_types::{
    CheckResultEntry, RelationRef, Row, RunId, StageLogEntry, StageStatus, Table,
};

use crate::error;

/// Storage contract for pipeline data and run logs.
///
/// Implementations must be `Send + Sync`; concurrent runs share one store
/// and rely on distinct run ids for row-level isolation of the log tables.
pub trait Store: Send + Sync {
    /// Read every row of a relation, in original insertion order.
    ///
    /// The returned order is part of the contract: deduplication uses it as
    /// the deterministic tie-break for equal recency timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`](crate::StoreError) if the relation is missing
    /// or unreadable.
    fn read_rows(&self, relation: &RelationRef) -> error::Result<Table>;

    /// Fully overwrite a relation with the given rows.
    ///
    /// The previous contents are discarded in the same transaction, which is
    /// what makes re-running a stage idempotent. Returns the row count
    /// written.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`](crate::StoreError) on storage failure or an
    /// invalid column name.
    fn replace_rows(
        &self,
        relation: &RelationRef,
        columns: &[String],
        rows: &[Row],
    ) -> error::Result<u64>;

    /// `COUNT(*)` over a relation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`](crate::StoreError) on storage failure.
    fn count_rows(&self, relation: &RelationRef) -> error::Result<i64>;

    /// Count of rows where `column` is null.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`](crate::StoreError) on storage failure or an
    /// invalid column name.
    fn count_nulls(&self, relation: &RelationRef, column: &str) -> error::Result<i64>;

    /// Oldest value of `column` as a UTC timestamp.
    ///
    /// Values are parsed individually and compared chronologically, so
    /// mixed text formats rank correctly. Returns `Ok(None)` when the
    /// relation is empty, the column is all null, or no value parses as a
    /// timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`](crate::StoreError) on storage failure or an
    /// invalid column name.
    fn min_timestamp(
        &self,
        relation: &RelationRef,
        column: &str,
    ) -> error::Result<Option<DateTime<Utc>>>;

    /// Insert the IN_PROGRESS execution log row for `(stage, run_id)`.
    ///
    /// Exactly one row may exist per pair; a duplicate insert is a storage
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`](crate::StoreError) on storage failure.
    fn begin_stage(&self, stage: &str, run_id: &RunId) -> error::Result<()>;

    /// Apply the single terminal update to the `(stage, run_id)` log row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`](crate::StoreError) on storage failure.
    #[allow(clippy::too_many_arguments)]
    fn finish_stage(
        &self,
        stage: &str,
        run_id: &RunId,
        status: StageStatus,
        rows_processed: u64,
        rows_failed: u64,
        elapsed_secs: f64,
        error_message: Option<&str>,
    ) -> error::Result<()>;

    /// Execution log rows for a run, in the order the stages began.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`](crate::StoreError) on storage failure.
    fn stage_log(&self, run_id: &RunId) -> error::Result<Vec<StageLogEntry>>;

    /// Append one validation result row (append-only, never updated).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`](crate::StoreError) on storage failure.
    fn append_check_result(&self, entry: &CheckResultEntry) -> error::Result<()>;

    /// Count of FAIL validation rows for `(run_id, table)`.
    ///
    /// The aggregator derives its verdict from this query rather than from
    /// in-memory rule outcomes, so re-running aggregation is idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`](crate::StoreError) on storage failure.
    fn count_failed_checks(&self, run_id: &RunId, table: &str) -> error::Result<i64>;

    /// Validation result rows for `(run_id, table)`, in append order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`](crate::StoreError) on storage failure.
    fn check_results(&self, run_id: &RunId, table: &str) -> error::Result<Vec<CheckResultEntry>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Verify the trait is object-safe (can be used as `dyn Store`).
    #[test]
    fn trait_is_object_safe() {
        fn _assert_object_safe(_: &dyn Store) {}
    }
}
