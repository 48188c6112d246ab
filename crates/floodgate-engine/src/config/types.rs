//! Pipeline configuration schema.

use std::path::PathBuf;

use floodgate_types::{CheckSpec, CleanSpec, DedupeSpec, DeriveSpec, RelationRef};
use serde::{Deserialize, Serialize};

/// Root pipeline configuration, deserialized from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Config format version.
    #[serde(default = "default_version")]
    pub version: String,
    /// Pipeline name, used in log messages.
    pub pipeline: String,
    /// Backing store location.
    pub store: StoreConfig,
    /// The three data tiers the stages move rows between.
    pub tables: TableTiers,
    /// Cleaning rules for the raw tier.
    pub clean: CleanSpec,
    /// Deduplication rules applied in place on the cleaned tier.
    pub dedupe: DedupeSpec,
    /// Business derivations producing the final tier.
    #[serde(default)]
    pub derive: DeriveSpec,
    /// Quality checks run against the final tier.
    #[serde(default)]
    pub checks: Vec<CheckSpec>,
}

fn default_version() -> String {
    "1.0".to_string()
}

/// Backing store location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
}

/// The qualified relations for each pipeline tier.
///
/// Deduplication rewrites the cleaned tier in place, so there are three
/// tiers, not four.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableTiers {
    /// Ingested rows, written by an external loader.
    pub raw: RelationRef,
    /// Output of cleaning and deduplication.
    pub cleaned: RelationRef,
    /// Output of business derivation; the tier quality checks run against.
    #[serde(rename = "final")]
    pub final_tier: RelationRef,
}
