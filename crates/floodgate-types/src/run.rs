//! Run identifiers and execution/validation log models.
//!
//! A run is one invocation of the orchestrator (or the quality-only entry
//! point). Every log row produced during that invocation references the same
//! [`RunId`] and is never mutated after reaching a terminal state.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Opaque run identifier (e.g. `"RUN_20260829_153000_a1b2c3d4"`).
///
/// Lexically sortable by creation time; see the engine's `run_id` module for
/// how identifiers are generated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    /// Wrap an existing identifier string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RunId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RunId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// ---------------------------------------------------------------------------
// Stage execution log
// ---------------------------------------------------------------------------

/// Status of a stage execution log entry.
///
/// A row is inserted in `InProgress` state before any work begins and is
/// updated exactly once to a terminal state. A row that stays `InProgress`
/// forever is the operational signal for a killed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StageStatus {
    InProgress,
    Success,
    Failed,
}

impl StageStatus {
    /// Wire-format string for storage.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "IN_PROGRESS",
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
        }
    }

    /// Parse a wire-format string back into a status.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "IN_PROGRESS" => Some(Self::InProgress),
            "SUCCESS" => Some(Self::Success),
            "FAILED" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for StageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the execution log: a single stage invocation under a run.
///
/// Exactly one entry exists per `(pipeline_name, run_id)` pair. Timestamps
/// are ISO-8601 UTC strings; backends handle storage formatting internally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageLogEntry {
    /// Stage identifier (e.g. `"CLEAN_RAW_DATA"`).
    pub pipeline_name: String,
    pub run_id: RunId,
    pub start_time: String,
    /// Unset until the entry reaches a terminal state.
    pub end_time: Option<String>,
    pub status: StageStatus,
    pub rows_processed: u64,
    pub rows_failed: u64,
    pub execution_time_seconds: Option<f64>,
    pub error_message: Option<String>,
}

// ---------------------------------------------------------------------------
// Validation result log
// ---------------------------------------------------------------------------

/// Verdict of a single quality check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckStatus {
    Pass,
    Fail,
}

impl CheckStatus {
    /// Wire-format string for storage.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
        }
    }

    /// Parse a wire-format string back into a status.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "PASS" => Some(Self::Pass),
            "FAIL" => Some(Self::Fail),
            _ => None,
        }
    }
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the validation result log. Append-only; immutable once written.
///
/// Several checks may target the same table under the same run, distinguished
/// by `check_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResultEntry {
    pub run_id: RunId,
    pub table_name: String,
    pub check_name: String,
    /// Check category (e.g. `"row_count"`).
    pub check_type: String,
    pub status: CheckStatus,
    pub expected_value: String,
    pub actual_value: String,
    pub message: String,
    /// ISO-8601 UTC timestamp, set by the producer at append time.
    pub created_at: String,
}
