use anyhow::Context;
use clap::Parser;
use configuration::{ConnectionConfig, init_tracing, load_settings};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

/// Batch ETL: combines the CSV files of a directory, writes the result to a
/// CSV file and loads it into PostgreSQL.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file to use instead of ./etl.toml.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// The main entry point for the ETL pipeline.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load DB_* and ETL_* variables from a .env file, if there is one.
    let dotenv = dotenvy::dotenv();
    let _guard = init_tracing();
    match dotenv {
        Ok(path) => info!("Environment variables loaded from {:?}", path),
        Err(_) => info!("No .env file found; using the process environment"),
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("ETL pipeline aborted: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = load_settings(cli.config.as_deref()).context("Failed to load pipeline settings")?;
    let connection = ConnectionConfig::from_env();

    let summary = pipeline::run_with_connection(&settings, &connection)
        .await
        .context("Pipeline run failed")?;

    info!(
        "Run {} complete: {} files, {} rows x {} columns written to {:?} and loaded into '{}'",
        summary.run_id,
        summary.files,
        summary.rows,
        summary.columns,
        summary.output_path,
        summary.table
    );
    Ok(())
}
