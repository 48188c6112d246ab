//! Pipeline YAML parsing with environment variable substitution.
//!
//! `${VAR_NAME}` placeholders anywhere in the file are expanded before
//! deserialization, so store paths and relation names can come from the
//! environment (e.g. one pipeline file per deployment tier).

use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::{Captures, Regex};

use crate::config::types::PipelineConfig;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid env var regex"));

/// Expand `${VAR_NAME}` placeholders from the process environment.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set.
pub fn substitute_env_vars(input: &str) -> Result<String> {
    let mut missing = Vec::new();
    let substituted = ENV_VAR_RE.replace_all(input, |caps: &Captures<'_>| {
        std::env::var(&caps[1]).unwrap_or_else(|_| {
            missing.push(caps[1].to_string());
            String::new()
        })
    });

    if !missing.is_empty() {
        anyhow::bail!(
            "pipeline config references unset environment variable(s): {}",
            missing.join(", ")
        );
    }

    Ok(substituted.into_owned())
}

/// Parse a pipeline definition from YAML text.
///
/// # Errors
///
/// Returns an error if env var substitution fails or the YAML does not
/// describe a valid pipeline.
pub fn parse_pipeline_str(yaml_str: &str) -> Result<PipelineConfig> {
    let substituted = substitute_env_vars(yaml_str)?;
    let config: PipelineConfig =
        serde_yaml::from_str(&substituted).context("invalid pipeline definition")?;
    Ok(config)
}

/// Parse a pipeline definition file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn parse_pipeline(path: &Path) -> Result<PipelineConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read pipeline file {}", path.display()))?;
    parse_pipeline_str(&content)
        .with_context(|| format!("in pipeline file {}", path.display()))
}
