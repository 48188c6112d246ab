//! Engine error types.

use floodgate_store::StoreError;
use floodgate_types::RunId;

/// Top-level failure of a pipeline run.
#[derive(Debug)]
pub enum PipelineError {
    /// A stage failed after its execution log row was finalized as FAILED.
    ///
    /// The orchestrator halts on this; earlier stage output stays in place.
    Stage {
        stage: String,
        run_id: RunId,
        message: String,
    },
    /// A failure outside any stage's accounting: configuration, store
    /// access before a stage began, or a log write that itself failed.
    Infrastructure(anyhow::Error),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stage {
                stage,
                run_id,
                message,
            } => {
                write!(f, "stage {stage} failed (run {run_id}): {message}")
            }
            Self::Infrastructure(err) => write!(f, "{err:#}"),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<anyhow::Error> for PipelineError {
    fn from(err: anyhow::Error) -> Self {
        Self::Infrastructure(err)
    }
}

impl From<StoreError> for PipelineError {
    fn from(err: StoreError) -> Self {
        Self::Infrastructure(err.into())
    }
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_error_names_stage_and_run() {
        let err = PipelineError::Stage {
            stage: "CLEAN_RAW_DATA".into(),
            run_id: RunId::new("RUN_20260829_120000_aaaa0000"),
            message: "source relation unreadable".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("CLEAN_RAW_DATA"), "got: {msg}");
        assert!(msg.contains("RUN_20260829_120000_aaaa0000"), "got: {msg}");
    }

    #[test]
    fn infrastructure_error_shows_chain() {
        let err = PipelineError::from(anyhow::anyhow!("root cause").context("opening store"));
        let msg = err.to_string();
        assert!(msg.contains("opening store"), "got: {msg}");
        assert!(msg.contains("root cause"), "got: {msg}");
    }
}
