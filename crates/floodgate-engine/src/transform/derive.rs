//! Business derivations: bucketing and date arithmetic on the final tier.

use anyhow::{bail, Result};
use chrono::Utc;
use floodgate_types::{DeriveRule, DeriveSpec, Row, Table, Value};

use crate::transform::TransformOutcome;

/// Apply derivation rules, appending one target column per rule.
///
/// A rule whose input is null or unparseable writes null to its target and
/// counts the row in `rows_failed`; the row itself always survives, so one
/// bad cell never discards an order.
///
/// # Errors
///
/// Returns an error if a rule's source column is missing from the table.
pub fn derive_rows(table: &Table, spec: &DeriveSpec) -> Result<TransformOutcome> {
    for rule in &spec.rules {
        match rule {
            DeriveRule::Bucket { source, .. } => {
                if !table.has_column(source) {
                    bail!("derive source column '{source}' not present in relation");
                }
            }
            DeriveRule::DateDiff {
                start_column,
                end_column,
                ..
            } => {
                if !table.has_column(start_column) {
                    bail!("derive source column '{start_column}' not present in relation");
                }
                if let Some(end) = end_column {
                    if !table.has_column(end) {
                        bail!("derive source column '{end}' not present in relation");
                    }
                }
            }
        }
    }

    let mut columns = table.columns.clone();
    for rule in &spec.rules {
        if !columns.iter().any(|c| c == rule.target()) {
            columns.push(rule.target().to_string());
        }
    }

    let mut out = Table::new(columns);
    let mut rows_failed = 0u64;

    for row in &table.rows {
        let mut row = row.clone();
        let mut failed = false;
        for rule in &spec.rules {
            let derived = apply_rule(&row, rule);
            if derived.is_null() {
                failed = true;
            }
            row.set(rule.target().to_string(), derived);
        }
        if failed {
            rows_failed += 1;
        }
        out.rows.push(row);
    }

    Ok(TransformOutcome {
        table: out,
        rows_failed,
    })
}

fn apply_rule(row: &Row, rule: &DeriveRule) -> Value {
    match rule {
        DeriveRule::Bucket {
            source,
            bounds,
            fallback_label,
            ..
        } => {
            let Some(value) = row.get(source).and_then(Value::as_f64) else {
                return Value::Null;
            };
            let label = bounds
                .iter()
                .find(|bound| value <= bound.upper)
                .map_or(fallback_label.as_str(), |bound| bound.label.as_str());
            Value::Text(label.to_string())
        }
        DeriveRule::DateDiff {
            start_column,
            end_column,
            ..
        } => {
            let Some(start) = row.get(start_column).and_then(Value::as_timestamp) else {
                return Value::Null;
            };
            let end = match end_column {
                Some(column) => match row.get(column).and_then(Value::as_timestamp) {
                    Some(ts) => ts,
                    None => return Value::Null,
                },
                None => Utc::now(),
            };
            Value::Integer((end - start).num_days())
        }
    }
}
