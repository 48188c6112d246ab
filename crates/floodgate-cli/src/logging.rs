use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber for the floodgate binary.
///
/// `RUST_LOG` takes precedence when set; otherwise the `--log-level` value
/// becomes the filter directive. Targets are suppressed since every event
/// carries the pipeline/run fields that matter operationally.
pub fn init(log_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
