mod commands;
mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "floodgate",
    version,
    about = "Staged data-pipeline runner with durable run logs"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: clean, deduplicate, transform, validate
    Run {
        /// Path to pipeline YAML file
        pipeline: PathBuf,
        /// Emit the run summary as a single JSON line
        #[arg(long)]
        json: bool,
    },
    /// Run only the quality checks against the final tier
    Validate {
        /// Path to pipeline YAML file
        pipeline: PathBuf,
        /// Emit the run summary as a single JSON line
        #[arg(long)]
        json: bool,
    },
    /// Show the execution log and check results for a past run
    Status {
        /// Path to pipeline YAML file
        pipeline: PathBuf,
        /// Run identifier (e.g. RUN_20260829_143000_9f8a3c1d)
        run_id: String,
        /// Emit the status as a single JSON line
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log_level);

    match cli.command {
        Commands::Run { pipeline, json } => commands::run::execute(&pipeline, json),
        Commands::Validate { pipeline, json } => commands::validate::execute(&pipeline, json),
        Commands::Status {
            pipeline,
            run_id,
            json,
        } => commands::status::execute(&pipeline, &run_id, json),
    }
}
