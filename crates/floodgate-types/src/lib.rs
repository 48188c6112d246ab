//! Shared model types for the Floodgate pipeline engine.
//!
//! Pure data types used by both the store and engine crates. Kept free of
//! storage and orchestration dependencies so the two can share them without
//! circular dependencies.

#![warn(clippy::pedantic)]

pub mod relation;
pub mod run;
pub mod spec;
pub mod value;

pub use relation::{validate_identifier, IdentifierError, RelationRef};
pub use run::{CheckResultEntry, CheckStatus, RunId, StageLogEntry, StageStatus};
pub use spec::{
    BucketBound, CheckSpec, CleanSpec, Coercion, CoercionType, DedupeSpec, DeriveRule, DeriveSpec,
};
pub use value::{Row, Table, Value};
