//! Entry point for the Cadence TUI application.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use cadence_core::{Config, HttpTaskApi};
use cadence_tui::{App, TuiError, TuiResult};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Environment variable naming the log file; logging is off without it
const LOG_FILE_ENV: &str = "CADENCE_LOG";

/// Cadence TUI - browse tasks and their completion calendars
#[derive(Parser)]
#[command(name = "cad-tui")]
#[command(version)]
#[command(about = "Terminal UI for recurring tasks", long_about = None)]
struct Args {
    /// Base URL of the task service (overrides CADENCE_API_URL and the config file)
    #[arg(long)]
    api_url: Option<String>,

    /// Path to the config file (defaults to <config dir>/cadence/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Send logs to the file named by `CADENCE_LOG`, filtered by `RUST_LOG`.
///
/// The terminal is owned by the UI, so nothing is logged to stderr.
fn init_logging() -> TuiResult<()> {
    let Some(path) = std::env::var_os(LOG_FILE_ENV).map(PathBuf::from) else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| TuiError::LogFile {
            path: path.clone(),
            source,
        })?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> TuiResult<()> {
    init_logging()?;

    let args = Args::parse();
    let config = Config::resolve(args.api_url, args.config.as_deref())?;
    let api = HttpTaskApi::new(&config)?;

    let mut app = App::new(api);
    app.run().await
}
