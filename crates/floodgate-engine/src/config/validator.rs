//! Semantic validation for parsed pipeline configuration values.

use anyhow::{bail, Result};
use floodgate_types::{validate_identifier, CheckSpec, DeriveRule};

use crate::config::types::PipelineConfig;

fn validate_columns(columns: &[String], context: &str, errors: &mut Vec<String>) {
    for column in columns {
        if let Err(err) = validate_identifier(column) {
            errors.push(format!("{context}: {err}"));
        }
    }
}

fn validate_derive_rules(rules: &[DeriveRule], errors: &mut Vec<String>) {
    let mut targets: Vec<&str> = Vec::new();
    for (i, rule) in rules.iter().enumerate() {
        let context = format!("derive rule {i}");
        if let Err(err) = validate_identifier(rule.target()) {
            errors.push(format!("{context}: {err}"));
        }
        if targets.contains(&rule.target()) {
            errors.push(format!(
                "{context}: duplicate target column '{}'",
                rule.target()
            ));
        }
        targets.push(rule.target());

        match rule {
            DeriveRule::Bucket { source, bounds, .. } => {
                if let Err(err) = validate_identifier(source) {
                    errors.push(format!("{context}: {err}"));
                }
                if bounds.is_empty() {
                    errors.push(format!("{context}: bucket rule needs at least one bound"));
                }
                for pair in bounds.windows(2) {
                    if pair[1].upper <= pair[0].upper {
                        errors.push(format!(
                            "{context}: bucket bounds must be strictly ascending ({} then {})",
                            pair[0].upper, pair[1].upper
                        ));
                    }
                }
            }
            DeriveRule::DateDiff {
                start_column,
                end_column,
                ..
            } => {
                if let Err(err) = validate_identifier(start_column) {
                    errors.push(format!("{context}: {err}"));
                }
                if let Some(end) = end_column {
                    if let Err(err) = validate_identifier(end) {
                        errors.push(format!("{context}: {err}"));
                    }
                }
            }
        }
    }
}

fn validate_checks(checks: &[CheckSpec], errors: &mut Vec<String>) {
    for (i, check) in checks.iter().enumerate() {
        let context = format!("check {i} ({})", check.check_name());
        match check {
            CheckSpec::RowCount { min_rows, max_rows } => {
                if let Some(max) = max_rows {
                    if max < min_rows {
                        errors.push(format!(
                            "{context}: max_rows {max} is below min_rows {min_rows}"
                        ));
                    }
                }
            }
            CheckSpec::NullPercent {
                column,
                max_percent,
            } => {
                if let Err(err) = validate_identifier(column) {
                    errors.push(format!("{context}: {err}"));
                }
                if !(0.0..=100.0).contains(max_percent) {
                    errors.push(format!(
                        "{context}: max_percent must be within 0..=100, got {max_percent}"
                    ));
                }
            }
            CheckSpec::Freshness {
                column,
                max_age_hours,
            } => {
                if let Err(err) = validate_identifier(column) {
                    errors.push(format!("{context}: {err}"));
                }
                if *max_age_hours <= 0.0 {
                    errors.push(format!(
                        "{context}: max_age_hours must be > 0, got {max_age_hours}"
                    ));
                }
            }
        }
    }
}

/// Validate a parsed pipeline configuration.
/// Returns `Ok(())` if valid, Err with all validation errors if not.
///
/// # Errors
///
/// Returns an error listing all validation failures found in the pipeline config.
pub fn validate_pipeline(config: &PipelineConfig) -> Result<()> {
    let mut errors = Vec::new();

    if config.version != "1.0" {
        errors.push(format!(
            "Unsupported pipeline version '{}', expected '1.0'",
            config.version
        ));
    }

    if config.pipeline.trim().is_empty() {
        errors.push("Pipeline name must not be empty".to_string());
    }

    if config.store.path.as_os_str().is_empty() {
        errors.push("Store path must not be empty".to_string());
    }

    if config.tables.raw == config.tables.cleaned {
        errors.push("Raw and cleaned tiers must be distinct relations".to_string());
    }
    if config.tables.final_tier == config.tables.raw
        || config.tables.final_tier == config.tables.cleaned
    {
        errors.push("Final tier must be distinct from the raw and cleaned tiers".to_string());
    }

    if config.clean.key_columns.is_empty() {
        errors.push("Clean stage needs at least one key column".to_string());
    }
    validate_columns(&config.clean.key_columns, "clean key_columns", &mut errors);
    for coercion in &config.clean.coercions {
        if let Err(err) = validate_identifier(&coercion.column) {
            errors.push(format!("clean coercions: {err}"));
        }
    }

    if config.dedupe.key_columns.is_empty() {
        errors.push("Dedupe stage needs at least one key column".to_string());
    }
    validate_columns(&config.dedupe.key_columns, "dedupe key_columns", &mut errors);
    if let Err(err) = validate_identifier(&config.dedupe.order_column) {
        errors.push(format!("dedupe order_column: {err}"));
    }

    validate_derive_rules(&config.derive.rules, &mut errors);
    validate_checks(&config.checks, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        bail!("Pipeline validation failed:\n  - {}", errors.join("\n  - "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parser::parse_pipeline_str;

    const VALID: &str = r"
pipeline: customer_orders
store:
  path: state/floodgate.db
tables:
  raw: RAW.STAGING_DATA
  cleaned: CLEANED.CLEANED_DATA
  final: ANALYTICS.FINAL_DATA
clean:
  key_columns: [order_id]
dedupe:
  key_columns: [order_id]
  order_column: processed_at
derive:
  rules:
    - kind: bucket
      source: amount
      target: amount_tier
      bounds:
        - { upper: 100.0, label: LOW }
        - { upper: 1000.0, label: MEDIUM }
      fallback_label: HIGH
checks:
  - type: row_count
    min_rows: 1
  - type: null_percent
    column: email
    max_percent: 5.0
  - type: freshness
    column: processed_at
    max_age_hours: 24
";

    #[test]
    fn valid_config_passes() {
        let config = parse_pipeline_str(VALID).unwrap();
        validate_pipeline(&config).unwrap();
    }

    #[test]
    fn collects_all_errors_in_one_pass() {
        let bad = VALID
            .replace("pipeline: customer_orders", "pipeline: \"\"")
            .replace("max_percent: 5.0", "max_percent: 150.0")
            .replace("max_age_hours: 24", "max_age_hours: -1");
        let config = parse_pipeline_str(&bad).unwrap();
        let msg = validate_pipeline(&config).unwrap_err().to_string();
        assert!(msg.contains("Pipeline name must not be empty"), "got: {msg}");
        assert!(msg.contains("max_percent"), "got: {msg}");
        assert!(msg.contains("max_age_hours"), "got: {msg}");
    }

    #[test]
    fn rejects_overlapping_tiers() {
        let bad = VALID.replace("CLEANED.CLEANED_DATA", "RAW.STAGING_DATA");
        let config = parse_pipeline_str(&bad).unwrap();
        let msg = validate_pipeline(&config).unwrap_err().to_string();
        assert!(msg.contains("distinct"), "got: {msg}");
    }

    #[test]
    fn rejects_descending_bucket_bounds() {
        let bad = VALID.replace("upper: 1000.0", "upper: 50.0");
        let config = parse_pipeline_str(&bad).unwrap();
        let msg = validate_pipeline(&config).unwrap_err().to_string();
        assert!(msg.contains("strictly ascending"), "got: {msg}");
    }

    #[test]
    fn rejects_row_count_max_below_min() {
        let bad = VALID.replace("min_rows: 1", "min_rows: 10\n    max_rows: 5");
        let config = parse_pipeline_str(&bad).unwrap();
        let msg = validate_pipeline(&config).unwrap_err().to_string();
        assert!(msg.contains("max_rows"), "got: {msg}");
    }

    #[test]
    fn rejects_unsupported_version() {
        let bad = format!("version: \"2.0\"\n{VALID}");
        let config = parse_pipeline_str(&bad).unwrap();
        let msg = validate_pipeline(&config).unwrap_err().to_string();
        assert!(msg.contains("Unsupported pipeline version"), "got: {msg}");
    }
}
