//! Declarative stage and check specifications.
//!
//! These describe *what* a stage or quality check does — cleaning rules,
//! dedupe keys, derivation rules, thresholds — never arbitrary code. They
//! deserialize straight out of the pipeline YAML; semantic validation
//! happens in the engine's config validator before anything executes.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Cleaning
// ---------------------------------------------------------------------------

/// Cleaning rules applied to the raw tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanSpec {
    /// Rows with a null in any of these columns are dropped.
    pub key_columns: Vec<String>,
    /// Trim leading/trailing whitespace from every text cell.
    #[serde(default = "default_true")]
    pub trim_text: bool,
    /// Best-effort type coercions; unparseable values become null.
    #[serde(default)]
    pub coercions: Vec<Coercion>,
}

/// A single try-coercion: parse `column` into the target type, null on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coercion {
    pub column: String,
    pub into: CoercionType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoercionType {
    Integer,
    Real,
    Timestamp,
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Deduplication
// ---------------------------------------------------------------------------

/// Deduplication rules: keep exactly one row per key-column set.
///
/// Within each key partition rows are ranked by `order_column` (a timestamp)
/// descending and only rank 1 survives. Ties on the timestamp fall back to
/// original insertion order: the earliest-read row wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupeSpec {
    pub key_columns: Vec<String>,
    /// Recency timestamp column (e.g. `"processed_at"`).
    pub order_column: String,
}

// ---------------------------------------------------------------------------
// Business derivation
// ---------------------------------------------------------------------------

/// Business-rule derivations applied when building the final tier.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeriveSpec {
    #[serde(default)]
    pub rules: Vec<DeriveRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeriveRule {
    /// Categorical bucketing on numeric thresholds: the label of the first
    /// bound whose `upper` is >= the source value, else `fallback_label`.
    Bucket {
        source: String,
        target: String,
        /// Must be non-empty and strictly ascending by `upper`.
        bounds: Vec<BucketBound>,
        fallback_label: String,
    },
    /// Whole-day difference `end_column - start_column` (or now when
    /// `end_column` is unset).
    DateDiff {
        start_column: String,
        #[serde(default)]
        end_column: Option<String>,
        target: String,
    },
}

impl DeriveRule {
    /// Name of the derived column this rule writes.
    #[must_use]
    pub fn target(&self) -> &str {
        match self {
            Self::Bucket { target, .. } | Self::DateDiff { target, .. } => target,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketBound {
    pub upper: f64,
    pub label: String,
}

// ---------------------------------------------------------------------------
// Quality checks
// ---------------------------------------------------------------------------

/// A single threshold-style quality check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckSpec {
    /// FAIL if `count < min_rows`, or `max_rows` is set and `count > max_rows`.
    RowCount {
        #[serde(default)]
        min_rows: u64,
        #[serde(default)]
        max_rows: Option<u64>,
    },
    /// FAIL if the column's null percentage exceeds `max_percent`; an empty
    /// relation is an explicit FAIL ("no rows to evaluate"), never a fault.
    NullPercent {
        column: String,
        #[serde(default = "default_max_null_percent")]
        max_percent: f64,
    },
    /// FAIL if the oldest record in `column` is older than `max_age_hours`;
    /// an empty relation is an explicit FAIL ("no records found").
    Freshness {
        column: String,
        #[serde(default = "default_max_age_hours")]
        max_age_hours: f64,
    },
}

fn default_max_null_percent() -> f64 {
    10.0
}

fn default_max_age_hours() -> f64 {
    24.0
}

impl CheckSpec {
    /// Check category recorded in the validation log.
    #[must_use]
    pub fn check_type(&self) -> &'static str {
        match self {
            Self::RowCount { .. } => "row_count",
            Self::NullPercent { .. } => "null_percent",
            Self::Freshness { .. } => "freshness",
        }
    }

    /// Distinguishing name for the validation log; column-scoped checks
    /// embed the column so several can target the same table in one run.
    #[must_use]
    pub fn check_name(&self) -> String {
        match self {
            Self::RowCount { .. } => "row_count".to_string(),
            Self::NullPercent { column, .. } => format!("null_percent_{column}"),
            Self::Freshness { column, .. } => format!("freshness_{column}"),
        }
    }
}
