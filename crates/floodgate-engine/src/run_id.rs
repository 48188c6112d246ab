//! Run identifier generation.
//!
//! Every run gets a fresh id of the form `{PREFIX}_{YYYYMMDD_HHMMSS}_{uuid8}`,
//! e.g. `RUN_20260829_143000_9f8a3c1d`. The timestamp keeps ids sortable and
//! human-readable; the uuid suffix makes two runs started in the same second
//! still collide-free.

use chrono::Utc;
use floodgate_types::RunId;
use uuid::Uuid;

/// Prefix for full pipeline runs.
pub const RUN_PREFIX: &str = "RUN";

/// Prefix for standalone validation runs.
pub const VALIDATION_PREFIX: &str = "VAL";

/// Generate a fresh run id with the given prefix.
#[must_use]
pub fn generate(prefix: &str) -> RunId {
    let stamp = Utc::now().format("%Y%m%d_%H%M%S");
    let suffix = &Uuid::new_v4().simple().to_string()[..8];
    RunId::new(format!("{prefix}_{stamp}_{suffix}"))
}
