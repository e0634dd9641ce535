//! CLI entry point for the TTC delay pipeline.
//!
//! Provides one subcommand per stage plus `run`, which executes the
//! file-to-file stages (clean, classify, summarize) in dependency order
//! over previously fetched raw data.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use ttc_delay_pipeline::{classify, clean, fetch, simulate, summarize};

#[derive(Parser)]
#[command(name = "ttc_delay_pipeline")]
#[command(about = "Prepare TTC delay records for reporting", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate synthetic delay tables with a fixed seed
    Simulate,
    /// Download the raw delay workbooks and persist them as CSV
    Fetch,
    /// Normalize, project, and filter the raw tables
    Clean,
    /// Categorize incidents, join codes, and normalize line names
    Classify,
    /// Compute the grouped summary tables
    Summarize,
    /// Clean, classify, and summarize previously fetched raw data
    Run,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/ttc_delay_pipeline.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("ttc_delay_pipeline.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate => simulate::run()?,
        Commands::Fetch => {
            let client = fetch::BasicClient::new();
            fetch::download_all(&client).await?;
        }
        Commands::Clean => clean::run()?,
        Commands::Classify => classify::run()?,
        Commands::Summarize => summarize::run()?,
        Commands::Run => {
            clean::run()?;
            classify::run()?;
            summarize::run()?;
        }
    }

    Ok(())
}
