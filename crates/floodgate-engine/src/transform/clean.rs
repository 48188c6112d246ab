//! Cleaning: trim text, drop rows with null keys, best-effort coercions.

use anyhow::{bail, Result};
use floodgate_types::{CleanSpec, CoercionType, Table, Value};

use crate::transform::TransformOutcome;

/// Apply cleaning rules to the raw tier.
///
/// Rows with a null (or absent) cell in any key column are dropped. Text
/// cells are whitespace-trimmed when the spec asks for it. Coercions are
/// best-effort: a value that does not parse into the target type becomes
/// null rather than failing the stage, so downstream null-percentage checks
/// surface bad source data instead of a crash. `rows_failed` counts dropped
/// rows plus surviving rows that lost a value to a failed coercion.
///
/// # Errors
///
/// Returns an error if a key or coercion column is missing from the table.
pub fn clean_rows(table: &Table, spec: &CleanSpec) -> Result<TransformOutcome> {
    for column in &spec.key_columns {
        if !table.has_column(column) {
            bail!("clean key column '{column}' not present in source relation");
        }
    }
    for coercion in &spec.coercions {
        if !table.has_column(&coercion.column) {
            bail!(
                "clean coercion column '{}' not present in source relation",
                coercion.column
            );
        }
    }

    let mut out = Table::new(table.columns.clone());
    let mut rows_failed = 0u64;

    for row in &table.rows {
        let null_key = spec
            .key_columns
            .iter()
            .any(|key| row.get(key).map_or(true, Value::is_null));
        if null_key {
            rows_failed += 1;
            continue;
        }

        let mut row = row.clone();
        if spec.trim_text {
            for column in &table.columns {
                if let Some(cell) = row.get_mut(column) {
                    if let Value::Text(s) = cell {
                        let trimmed = s.trim();
                        if trimmed.len() != s.len() {
                            *cell = Value::Text(trimmed.to_string());
                        }
                    }
                }
            }
        }

        let mut coercion_failed = false;
        for coercion in &spec.coercions {
            if let Some(cell) = row.get_mut(&coercion.column) {
                let coerced = coerce(cell, coercion.into);
                if coerced.is_null() && !cell.is_null() {
                    coercion_failed = true;
                }
                *cell = coerced;
            }
        }
        if coercion_failed {
            rows_failed += 1;
        }

        out.rows.push(row);
    }

    Ok(TransformOutcome {
        table: out,
        rows_failed,
    })
}

/// Coerce a cell into the target type, null on failure. Nulls stay null.
fn coerce(value: &Value, into: CoercionType) -> Value {
    if value.is_null() {
        return Value::Null;
    }
    match into {
        CoercionType::Integer => match value {
            Value::Integer(_) => value.clone(),
            Value::Text(s) => s.trim().parse::<i64>().map_or(Value::Null, Value::Integer),
            Value::Real(_) | Value::Null => Value::Null,
        },
        CoercionType::Real => match value {
            Value::Real(_) => value.clone(),
            #[allow(clippy::cast_precision_loss)]
            Value::Integer(i) => Value::Real(*i as f64),
            Value::Text(s) => s.trim().parse::<f64>().map_or(Value::Null, Value::Real),
            Value::Null => Value::Null,
        },
        CoercionType::Timestamp => {
            if value.as_timestamp().is_some() {
                value.clone()
            } else {
                Value::Null
            }
        }
    }
}
