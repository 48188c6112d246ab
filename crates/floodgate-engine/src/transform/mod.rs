//! Pure row transforms backing the three data stages.
//!
//! Each transform takes a materialized [`Table`] and a declarative spec and
//! produces a new table plus a count of rows that failed the transform's
//! rules. Transforms never touch the store; reading the source relation and
//! writing the target relation is the stage runner's job, which is what
//! keeps these functions trivially testable.

pub mod clean;
pub mod dedupe;
pub mod derive;

pub use clean::clean_rows;
pub use dedupe::dedupe_rows;
pub use derive::derive_rows;

use floodgate_types::Table;

/// Result of one transform: the output table and the number of input rows
/// that failed the transform's rules (dropped or written with null output).
#[derive(Debug)]
pub struct TransformOutcome {
    pub table: Table,
    pub rows_failed: u64,
}
