//! Cell values and rows moving between relations.
//!
//! Relations live in the external store; the engine only ever holds rows in
//! memory while a stage transforms them from a source relation into a target
//! relation.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    /// `true` for [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric view of the cell, if it has one.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Real(r) => Some(*r),
            Self::Null | Self::Text(_) => None,
        }
    }

    /// Text view of the cell, if it is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Parse a text cell as a UTC timestamp.
    ///
    /// Accepts RFC 3339 as well as the bare `YYYY-MM-DD HH:MM:SS` and
    /// `YYYY-MM-DDTHH:MM:SS` forms (interpreted as UTC), which is what SQL
    /// stores typically hand back for datetime columns.
    #[must_use]
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        let raw = self.as_text()?;
        parse_timestamp(raw)
    }
}

/// Parse a timestamp string in the formats accepted by [`Value::as_timestamp`].
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(ndt.and_utc());
        }
    }
    None
}

/// One row: an ordered column-to-value map.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    cells: BTreeMap<String, Value>,
}

impl Row {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cell, replacing any existing value for the column.
    pub fn set(&mut self, column: impl Into<String>, value: Value) {
        self.cells.insert(column.into(), value);
    }

    /// Cell for `column`, or `None` if the row has no such column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.cells.get(column)
    }

    /// Mutable cell access, for in-place transforms.
    pub fn get_mut(&mut self, column: &str) -> Option<&mut Value> {
        self.cells.get_mut(column)
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

/// A materialized relation snapshot: column list plus rows.
///
/// `rows` preserve the store's read order (original insertion order), which
/// is the deterministic tie-break for deduplication.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    #[must_use]
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// `true` when the table has a column with the given name.
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_f64_covers_numeric_variants() {
        assert_eq!(Value::Integer(3).as_f64(), Some(3.0));
        assert_eq!(Value::Real(2.5).as_f64(), Some(2.5));
        assert_eq!(Value::Text("3".into()).as_f64(), None);
        assert_eq!(Value::Null.as_f64(), None);
    }

    #[test]
    fn timestamp_parses_rfc3339_and_sql_forms() {
        for raw in [
            "2026-08-29T12:00:00Z",
            "2026-08-29T12:00:00+00:00",
            "2026-08-29 12:00:00",
            "2026-08-29T12:00:00",
        ] {
            let ts = Value::Text(raw.into()).as_timestamp().unwrap();
            assert_eq!(ts.to_rfc3339(), "2026-08-29T12:00:00+00:00", "input: {raw}");
        }
        assert!(Value::Text("yesterday".into()).as_timestamp().is_none());
        assert!(Value::Integer(0).as_timestamp().is_none());
    }

    #[test]
    fn row_set_get_overwrite() {
        let mut row = Row::new();
        row.set("col1", Value::Text("a".into()));
        row.set("col1", Value::Text("b".into()));
        assert_eq!(row.get("col1"), Some(&Value::Text("b".into())));
        assert_eq!(row.get("missing"), None);
    }

    #[test]
    fn value_serde_untagged() {
        assert_eq!(serde_json::to_string(&Value::Null).unwrap(), "null");
        assert_eq!(serde_json::to_string(&Value::Integer(7)).unwrap(), "7");
        assert_eq!(
            serde_json::to_string(&Value::Text("x".into())).unwrap(),
            "\"x\""
        );
    }

    #[test]
    fn table_has_column() {
        let table = Table::new(vec!["a".into(), "b".into()]);
        assert!(table.has_column("a"));
        assert!(!table.has_column("c"));
    }
}
