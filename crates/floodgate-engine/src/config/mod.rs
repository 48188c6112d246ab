//! Pipeline configuration: types, YAML parsing, semantic validation.

pub mod parser;
pub mod types;
pub mod validator;

pub use parser::{parse_pipeline, parse_pipeline_str};
pub use types::{PipelineConfig, StoreConfig, TableTiers};
pub use validator::validate_pipeline;
