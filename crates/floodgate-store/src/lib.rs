//! Store boundary for the Floodgate pipeline engine.
//!
//! Provides the [`Store`] trait — the engine's only way of touching the
//! external relational store — and a [`SqliteStore`] implementation used
//! both as the in-tree backend and as the test double.

#![warn(clippy::pedantic)]

pub mod error;
pub mod sqlite;
pub mod store;

pub use error::{Result, StoreError};
pub use sqlite::SqliteStore;
pub use store::Store;
