//! Floodgate pipeline engine.
//!
//! Drives a fixed four-stage run against an external relational store:
//! clean the raw tier, deduplicate, apply business derivations, then run
//! declarative quality checks over the final tier. Every stage writes an
//! execution log row (IN_PROGRESS, then exactly one terminal update), and
//! every quality check appends a durable validation result row. Stages run
//! sequentially; a failed stage halts the run with earlier stage output
//! left in place.

#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod run_id;
pub mod stage;
pub mod transform;
pub mod validation;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use orchestrator::{run_pipeline, run_validation_only, PipelineSummary};
pub use stage::StageReport;
pub use validation::Verdict;
