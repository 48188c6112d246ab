//! `SQLite`-backed implementation of [`Store`].
//!
//! Uses a single `Mutex<Connection>` for thread safety. `SQLite` has no
//! schemas, so a qualified relation like `CLEANED.CLEANED_DATA` maps to a
//! single quoted table name containing the dot. Relation and column names
//! are validated before they are spliced into SQL text.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, NaiveDateTime, Utc};
use floodgate_types::value::parse_timestamp;
use floodgate_types::{
    validate_identifier, CheckResultEntry, CheckStatus, RelationRef, Row, RunId, StageLogEntry,
    StageStatus, Table, Value,
};
use rusqlite::types::ValueRef;
use rusqlite::Connection;

use crate::error::{self, StoreError};
use crate::store::Store;

/// `SQLite` datetime format (UTC, no timezone suffix).
const SQLITE_DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// Idempotent DDL for the two log relations.
const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS "pipeline_logs" (
    pipeline_name TEXT NOT NULL,
    run_id TEXT NOT NULL,
    start_time TEXT NOT NULL DEFAULT (datetime('now')),
    end_time TEXT,
    status TEXT NOT NULL,
    rows_processed INTEGER NOT NULL DEFAULT 0,
    rows_failed INTEGER NOT NULL DEFAULT 0,
    execution_time_seconds REAL,
    error_message TEXT,
    PRIMARY KEY (pipeline_name, run_id)
);

CREATE TABLE IF NOT EXISTS "validation_results" (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id TEXT NOT NULL,
    table_name TEXT NOT NULL,
    check_name TEXT NOT NULL,
    check_type TEXT NOT NULL,
    status TEXT NOT NULL,
    expected_value TEXT NOT NULL,
    actual_value TEXT NOT NULL,
    message TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_validation_run_table
    ON "validation_results" (run_id, table_name);
"#;

/// `SQLite`-backed store.
///
/// Create with [`SqliteStore::open`] for file-backed persistence or
/// [`SqliteStore::in_memory`] for tests.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a `SQLite` database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory can't be created, or
    /// [`StoreError::Sqlite`] if the database can't be opened.
    pub fn open(path: &Path) -> error::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(CREATE_TABLES)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (for testing).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Sqlite`] if the in-memory database can't be
    /// initialized.
    pub fn in_memory() -> error::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(CREATE_TABLES)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the connection lock.
    fn lock_conn(&self) -> error::Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Render a relation as a quoted single-table name.
    fn table_ident(relation: &RelationRef) -> String {
        // Parts are allow-list validated at construction; no quote can occur.
        format!("\"{}.{}\"", relation.schema(), relation.table())
    }

    /// Validate and quote a column name.
    fn column_ident(column: &str) -> error::Result<String> {
        validate_identifier(column)?;
        Ok(format!("\"{column}\""))
    }

    /// Convert a `SQLite` datetime string to ISO-8601.
    fn sqlite_to_iso8601(raw: &str) -> String {
        NaiveDateTime::parse_from_str(raw, SQLITE_DATETIME_FMT).map_or_else(
            |_| raw.to_string(),
            |ndt| format!("{}Z", ndt.format("%Y-%m-%dT%H:%M:%S")),
        )
    }

    /// Convert an ISO-8601 string to `SQLite` datetime format.
    fn iso8601_to_sqlite(iso: &str) -> String {
        DateTime::parse_from_rfc3339(iso).map_or_else(
            |_| iso.to_string(),
            |dt| dt.format(SQLITE_DATETIME_FMT).to_string(),
        )
    }
}

fn value_from_sql(raw: ValueRef<'_>) -> Value {
    match raw {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(r) => Value::Real(r),
        ValueRef::Text(t) | ValueRef::Blob(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
    }
}

fn value_to_sql(value: &Value) -> rusqlite::types::Value {
    match value {
        Value::Null => rusqlite::types::Value::Null,
        Value::Integer(i) => rusqlite::types::Value::Integer(*i),
        Value::Real(r) => rusqlite::types::Value::Real(*r),
        Value::Text(t) => rusqlite::types::Value::Text(t.clone()),
    }
}

impl Store for SqliteStore {
    fn read_rows(&self, relation: &RelationRef) -> error::Result<Table> {
        let conn = self.lock_conn()?;
        let sql = format!(
            "SELECT * FROM {} ORDER BY rowid",
            Self::table_ident(relation)
        );
        let mut stmt = conn.prepare(&sql)?;
        let columns: Vec<String> = stmt.column_names().iter().map(ToString::to_string).collect();

        let mut table = Table::new(columns.clone());
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let mut out = Row::new();
            for (i, column) in columns.iter().enumerate() {
                out.set(column.clone(), value_from_sql(row.get_ref(i)?));
            }
            table.rows.push(out);
        }
        Ok(table)
    }

    fn replace_rows(
        &self,
        relation: &RelationRef,
        columns: &[String],
        rows: &[Row],
    ) -> error::Result<u64> {
        let quoted: Vec<String> = columns
            .iter()
            .map(|c| Self::column_ident(c))
            .collect::<error::Result<_>>()?;
        let table_name = Self::table_ident(relation);

        let conn = self.lock_conn()?;
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {table_name}; CREATE TABLE {table_name} ({});",
            quoted.join(", ")
        ))?;

        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO {table_name} ({}) VALUES ({})",
            quoted.join(", "),
            placeholders.join(", ")
        ))?;

        let mut count = 0u64;
        for row in rows {
            let params: Vec<rusqlite::types::Value> = columns
                .iter()
                .map(|c| row.get(c).map_or(rusqlite::types::Value::Null, value_to_sql))
                .collect();
            stmt.execute(rusqlite::params_from_iter(params))?;
            count += 1;
        }
        drop(stmt);
        tx.commit()?;
        Ok(count)
    }

    fn count_rows(&self, relation: &RelationRef) -> error::Result<i64> {
        let conn = self.lock_conn()?;
        let sql = format!("SELECT COUNT(*) FROM {}", Self::table_ident(relation));
        Ok(conn.query_row(&sql, [], |row| row.get(0))?)
    }

    fn count_nulls(&self, relation: &RelationRef, column: &str) -> error::Result<i64> {
        let column = Self::column_ident(column)?;
        let conn = self.lock_conn()?;
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE {column} IS NULL",
            Self::table_ident(relation)
        );
        Ok(conn.query_row(&sql, [], |row| row.get(0))?)
    }

    fn min_timestamp(
        &self,
        relation: &RelationRef,
        column: &str,
    ) -> error::Result<Option<DateTime<Utc>>> {
        let column = Self::column_ident(column)?;
        let conn = self.lock_conn()?;
        // SQL MIN over a TEXT column is lexicographic, and the accepted
        // timestamp forms do not sort consistently ('2026-01-01 ..' sorts
        // before '2026-01-01T..'), so the minimum is taken after parsing.
        let sql = format!(
            "SELECT {column} FROM {} WHERE {column} IS NOT NULL",
            Self::table_ident(relation)
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut oldest: Option<DateTime<Utc>> = None;
        while let Some(row) = rows.next()? {
            if let ValueRef::Text(raw) = row.get_ref(0)? {
                if let Some(ts) = parse_timestamp(&String::from_utf8_lossy(raw)) {
                    oldest = Some(oldest.map_or(ts, |cur| cur.min(ts)));
                }
            }
        }
        Ok(oldest)
    }

    fn begin_stage(&self, stage: &str, run_id: &RunId) -> error::Result<()> {
        let conn = self.lock_conn()?;
        conn.execute(
            "INSERT INTO \"pipeline_logs\" (pipeline_name, run_id, status) VALUES (?1, ?2, ?3)",
            rusqlite::params![stage, run_id.as_str(), StageStatus::InProgress.as_str()],
        )?;
        Ok(())
    }

    #[allow(clippy::cast_possible_wrap)]
    fn finish_stage(
        &self,
        stage: &str,
        run_id: &RunId,
        status: StageStatus,
        rows_processed: u64,
        rows_failed: u64,
        elapsed_secs: f64,
        error_message: Option<&str>,
    ) -> error::Result<()> {
        let conn = self.lock_conn()?;
        conn.execute(
            "UPDATE \"pipeline_logs\" SET end_time = datetime('now'), status = ?1, \
             rows_processed = ?2, rows_failed = ?3, execution_time_seconds = ?4, \
             error_message = ?5 \
             WHERE pipeline_name = ?6 AND run_id = ?7",
            rusqlite::params![
                status.as_str(),
                rows_processed as i64,
                rows_failed as i64,
                elapsed_secs,
                error_message,
                stage,
                run_id.as_str(),
            ],
        )?;
        Ok(())
    }

    #[allow(clippy::cast_sign_loss)]
    fn stage_log(&self, run_id: &RunId) -> error::Result<Vec<StageLogEntry>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(
            "SELECT pipeline_name, run_id, start_time, end_time, status, \
             rows_processed, rows_failed, execution_time_seconds, error_message \
             FROM \"pipeline_logs\" WHERE run_id = ?1 ORDER BY rowid",
        )?;
        let entries = stmt
            .query_map([run_id.as_str()], |row| {
                let status_raw: String = row.get(4)?;
                let status = StageStatus::parse(&status_raw).ok_or_else(|| {
                    rusqlite::Error::FromSqlConversionFailure(
                        4,
                        rusqlite::types::Type::Text,
                        format!("unknown stage status '{status_raw}'").into(),
                    )
                })?;
                let start_time: String = row.get(2)?;
                let end_time: Option<String> = row.get(3)?;
                let rows_processed: i64 = row.get(5)?;
                let rows_failed: i64 = row.get(6)?;
                Ok(StageLogEntry {
                    pipeline_name: row.get(0)?,
                    run_id: RunId::new(row.get::<_, String>(1)?),
                    start_time: Self::sqlite_to_iso8601(&start_time),
                    end_time: end_time.as_deref().map(Self::sqlite_to_iso8601),
                    status,
                    rows_processed: rows_processed as u64,
                    rows_failed: rows_failed as u64,
                    execution_time_seconds: row.get(7)?,
                    error_message: row.get(8)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    fn append_check_result(&self, entry: &CheckResultEntry) -> error::Result<()> {
        let conn = self.lock_conn()?;
        conn.execute(
            "INSERT INTO \"validation_results\" \
             (run_id, table_name, check_name, check_type, status, \
              expected_value, actual_value, message, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
                entry.run_id.as_str(),
                entry.table_name,
                entry.check_name,
                entry.check_type,
                entry.status.as_str(),
                entry.expected_value,
                entry.actual_value,
                entry.message,
                Self::iso8601_to_sqlite(&entry.created_at),
            ],
        )?;
        Ok(())
    }

    fn count_failed_checks(&self, run_id: &RunId, table: &str) -> error::Result<i64> {
        let conn = self.lock_conn()?;
        Ok(conn.query_row(
            "SELECT COUNT(*) FROM \"validation_results\" \
             WHERE run_id = ?1 AND table_name = ?2 AND status = ?3",
            rusqlite::params![run_id.as_str(), table, CheckStatus::Fail.as_str()],
            |row| row.get(0),
        )?)
    }

    fn check_results(&self, run_id: &RunId, table: &str) -> error::Result<Vec<CheckResultEntry>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(
            "SELECT run_id, table_name, check_name, check_type, status, \
             expected_value, actual_value, message, created_at \
             FROM \"validation_results\" WHERE run_id = ?1 AND table_name = ?2 ORDER BY id",
        )?;
        let entries = stmt
            .query_map(rusqlite::params![run_id.as_str(), table], |row| {
                let status_raw: String = row.get(4)?;
                let status = CheckStatus::parse(&status_raw).ok_or_else(|| {
                    rusqlite::Error::FromSqlConversionFailure(
                        4,
                        rusqlite::types::Type::Text,
                        format!("unknown check status '{status_raw}'").into(),
                    )
                })?;
                let created_at: String = row.get(8)?;
                Ok(CheckResultEntry {
                    run_id: RunId::new(row.get::<_, String>(0)?),
                    table_name: row.get(1)?,
                    check_name: row.get(2)?,
                    check_type: row.get(3)?,
                    status,
                    expected_value: row.get(5)?,
                    actual_value: row.get(6)?,
                    message: row.get(7)?,
                    created_at: Self::sqlite_to_iso8601(&created_at),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(name: &str) -> RelationRef {
        RelationRef::parse(name).unwrap()
    }

    fn text(s: &str) -> Value {
        Value::Text(s.into())
    }

    fn seed_rows(store: &SqliteStore, relation: &RelationRef, rows: &[(&str, Option<&str>)]) {
        let columns = vec!["col1".to_string(), "col2".to_string()];
        let rows: Vec<Row> = rows
            .iter()
            .map(|(a, b)| {
                let mut row = Row::new();
                row.set("col1", text(a));
                row.set("col2", b.map_or(Value::Null, text));
                row
            })
            .collect();
        store.replace_rows(relation, &columns, &rows).unwrap();
    }

    #[test]
    fn replace_and_read_preserves_order_and_values() {
        let store = SqliteStore::in_memory().unwrap();
        let relation = rel("RAW.STAGING");
        seed_rows(
            &store,
            &relation,
            &[("a", Some("x")), ("b", None), ("c", Some("z"))],
        );

        let table = store.read_rows(&relation).unwrap();
        assert_eq!(table.columns, vec!["col1", "col2"]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0].get("col1"), Some(&text("a")));
        assert_eq!(table.rows[1].get("col2"), Some(&Value::Null));
        assert_eq!(table.rows[2].get("col1"), Some(&text("c")));
    }

    #[test]
    fn replace_fully_overwrites() {
        let store = SqliteStore::in_memory().unwrap();
        let relation = rel("RAW.STAGING");
        seed_rows(&store, &relation, &[("a", Some("x")), ("b", Some("y"))]);
        seed_rows(&store, &relation, &[("only", Some("row"))]);

        assert_eq!(store.count_rows(&relation).unwrap(), 1);
        let table = store.read_rows(&relation).unwrap();
        assert_eq!(table.rows[0].get("col1"), Some(&text("only")));
    }

    #[test]
    fn counts_and_nulls() {
        let store = SqliteStore::in_memory().unwrap();
        let relation = rel("RAW.STAGING");
        seed_rows(
            &store,
            &relation,
            &[("a", None), ("b", Some("y")), ("c", None)],
        );

        assert_eq!(store.count_rows(&relation).unwrap(), 3);
        assert_eq!(store.count_nulls(&relation, "col2").unwrap(), 2);
        assert_eq!(store.count_nulls(&relation, "col1").unwrap(), 0);
    }

    #[test]
    fn rejects_invalid_column_identifier() {
        let store = SqliteStore::in_memory().unwrap();
        let relation = rel("RAW.STAGING");
        seed_rows(&store, &relation, &[("a", Some("x"))]);

        let err = store
            .count_nulls(&relation, "col2\" IS NULL; DROP TABLE \"RAW.STAGING")
            .expect_err("injection string should be rejected");
        assert!(matches!(err, StoreError::InvalidIdentifier(_)));
    }

    #[test]
    fn min_timestamp_parses_and_handles_empty() {
        let store = SqliteStore::in_memory().unwrap();
        let relation = rel("CLEANED.DATA");
        let columns = vec!["processed_at".to_string()];

        store.replace_rows(&relation, &columns, &[]).unwrap();
        assert!(store
            .min_timestamp(&relation, "processed_at")
            .unwrap()
            .is_none());

        let rows: Vec<Row> = ["2026-08-02T09:00:00Z", "2026-08-01T09:00:00Z"]
            .iter()
            .map(|ts| {
                let mut row = Row::new();
                row.set("processed_at", text(ts));
                row
            })
            .collect();
        store.replace_rows(&relation, &columns, &rows).unwrap();

        let min = store
            .min_timestamp(&relation, "processed_at")
            .unwrap()
            .unwrap();
        assert_eq!(min.to_rfc3339(), "2026-08-01T09:00:00+00:00");
    }

    #[test]
    fn min_timestamp_is_chronological_across_text_formats() {
        let store = SqliteStore::in_memory().unwrap();
        let relation = rel("CLEANED.DATA");
        let columns = vec!["processed_at".to_string()];

        // Space-separated sorts before 'T'-separated lexicographically, so
        // a raw SQL MIN would pick the newer row here.
        let rows: Vec<Row> = ["2026-08-29 23:00:00", "2026-08-29T01:00:00"]
            .iter()
            .map(|ts| {
                let mut row = Row::new();
                row.set("processed_at", text(ts));
                row
            })
            .collect();
        store.replace_rows(&relation, &columns, &rows).unwrap();

        let min = store
            .min_timestamp(&relation, "processed_at")
            .unwrap()
            .unwrap();
        assert_eq!(min.to_rfc3339(), "2026-08-29T01:00:00+00:00");
    }

    #[test]
    fn min_timestamp_skips_unparseable_values() {
        let store = SqliteStore::in_memory().unwrap();
        let relation = rel("CLEANED.DATA");
        let columns = vec!["processed_at".to_string()];

        let rows: Vec<Row> = ["garbage", "2026-08-02 09:00:00"]
            .iter()
            .map(|ts| {
                let mut row = Row::new();
                row.set("processed_at", text(ts));
                row
            })
            .collect();
        store.replace_rows(&relation, &columns, &rows).unwrap();

        let min = store
            .min_timestamp(&relation, "processed_at")
            .unwrap()
            .unwrap();
        assert_eq!(min.to_rfc3339(), "2026-08-02T09:00:00+00:00");

        // A column with nothing parseable yields no timestamp at all.
        let rows = vec![{
            let mut row = Row::new();
            row.set("processed_at", text("soon"));
            row
        }];
        store.replace_rows(&relation, &columns, &rows).unwrap();
        assert!(store
            .min_timestamp(&relation, "processed_at")
            .unwrap()
            .is_none());
    }

    #[test]
    fn stage_log_lifecycle() {
        let store = SqliteStore::in_memory().unwrap();
        let run_id = RunId::new("RUN_20260829_120000_aaaa0000");

        store.begin_stage("CLEAN_RAW_DATA", &run_id).unwrap();
        let log = store.stage_log(&run_id).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].status, StageStatus::InProgress);
        assert!(log[0].end_time.is_none());

        store
            .finish_stage(
                "CLEAN_RAW_DATA",
                &run_id,
                StageStatus::Success,
                100,
                3,
                1.25,
                None,
            )
            .unwrap();
        let log = store.stage_log(&run_id).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].status, StageStatus::Success);
        assert_eq!(log[0].rows_processed, 100);
        assert_eq!(log[0].rows_failed, 3);
        assert!(log[0].end_time.is_some());
        assert_eq!(log[0].execution_time_seconds, Some(1.25));
    }

    #[test]
    fn stage_log_failure_keeps_message() {
        let store = SqliteStore::in_memory().unwrap();
        let run_id = RunId::new("RUN_x");
        store.begin_stage("REMOVE_DUPLICATES", &run_id).unwrap();
        store
            .finish_stage(
                "REMOVE_DUPLICATES",
                &run_id,
                StageStatus::Failed,
                0,
                0,
                0.1,
                Some("source relation unreadable"),
            )
            .unwrap();

        let log = store.stage_log(&run_id).unwrap();
        assert_eq!(log[0].status, StageStatus::Failed);
        assert_eq!(
            log[0].error_message.as_deref(),
            Some("source relation unreadable")
        );
    }

    #[test]
    fn duplicate_begin_stage_is_rejected() {
        let store = SqliteStore::in_memory().unwrap();
        let run_id = RunId::new("RUN_x");
        store.begin_stage("CLEAN_RAW_DATA", &run_id).unwrap();
        assert!(store.begin_stage("CLEAN_RAW_DATA", &run_id).is_err());
    }

    #[test]
    fn check_results_append_and_count() {
        let store = SqliteStore::in_memory().unwrap();
        let run_id = RunId::new("VAL_x");
        let entry = |name: &str, status: CheckStatus| CheckResultEntry {
            run_id: run_id.clone(),
            table_name: "ANALYTICS.FINAL_DATA".into(),
            check_name: name.into(),
            check_type: "row_count".into(),
            status,
            expected_value: ">= 1".into(),
            actual_value: "0".into(),
            message: "row count 0 below minimum 1".into(),
            created_at: "2026-08-29T12:00:00Z".into(),
        };

        store
            .append_check_result(&entry("row_count", CheckStatus::Fail))
            .unwrap();
        store
            .append_check_result(&entry("null_percent_col1", CheckStatus::Pass))
            .unwrap();
        store
            .append_check_result(&entry("freshness_col2", CheckStatus::Fail))
            .unwrap();

        assert_eq!(
            store
                .count_failed_checks(&run_id, "ANALYTICS.FINAL_DATA")
                .unwrap(),
            2
        );
        assert_eq!(
            store
                .count_failed_checks(&run_id, "OTHER.TABLE")
                .unwrap(),
            0
        );

        let results = store
            .check_results(&run_id, "ANALYTICS.FINAL_DATA")
            .unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].check_name, "row_count");
        assert_eq!(results[0].created_at, "2026-08-29T12:00:00Z");
        assert_eq!(results[1].status, CheckStatus::Pass);
    }

    #[test]
    fn concurrent_runs_do_not_contend_on_log_rows() {
        let store = SqliteStore::in_memory().unwrap();
        let run_a = RunId::new("RUN_a");
        let run_b = RunId::new("RUN_b");

        store.begin_stage("CLEAN_RAW_DATA", &run_a).unwrap();
        store.begin_stage("CLEAN_RAW_DATA", &run_b).unwrap();
        store
            .finish_stage("CLEAN_RAW_DATA", &run_a, StageStatus::Success, 1, 0, 0.1, None)
            .unwrap();

        let log_b = store.stage_log(&run_b).unwrap();
        assert_eq!(log_b[0].status, StageStatus::InProgress);
    }

    #[test]
    fn open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/state/floodgate.db");
        let store = SqliteStore::open(&path).unwrap();
        let run_id = RunId::new("RUN_x");
        store.begin_stage("CLEAN_RAW_DATA", &run_id).unwrap();
        assert!(path.exists());
    }
}
