use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use cadence_cli::{CliResult, Command};
use cadence_core::{Config, HttpTaskApi};
use chrono::Local;

/// Cadence - track recurring tasks and their completion history
#[derive(Parser)]
#[command(name = "cad")]
#[command(version)]
#[command(about = "Track recurring tasks and their completion history", long_about = None)]
struct Args {
    /// Base URL of the task service (overrides CADENCE_API_URL and the config file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Path to the config file (defaults to <config dir>/cadence/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Option<Command>,
}

/// Initialize logging from `RUST_LOG`, defaulting to warnings only.
///
/// Examples:
/// - `RUST_LOG=debug` - show every request sent to the task service
/// - `RUST_LOG=cadence_core=info` - show refreshes and updates from the core
fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .init();
}

#[tokio::main]
async fn main() {
    init_logging();

    if let Err(e) = run_app().await {
        eprintln!("error: {}", e.full_message());
        process::exit(1);
    }
}

/// Main application logic - separated for testability
async fn run_app() -> CliResult<()> {
    let args = Args::parse();
    let output = run_with_args(&args).await?;
    println!("{}", output);
    Ok(())
}

/// Run the application with the given arguments and return what to print
async fn run_with_args(args: &Args) -> CliResult<String> {
    let Some(command) = &args.command else {
        return Ok("Welcome to Cadence!\nUse 'cad --help' for usage information.".to_string());
    };

    // Priority: --api-url > CADENCE_API_URL > config file > default
    let config = Config::resolve(args.api_url.clone(), args.config.as_deref())?;
    let api = HttpTaskApi::new(&config)?;

    command.execute(&api, &Local::now()).await
}
