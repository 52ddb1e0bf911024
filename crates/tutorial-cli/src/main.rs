//! # tutorials CLI entry point
//!
//! Parses command-line arguments and dispatches to the subcommand
//! handlers in `tutorial_cli::commands`.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tutorial_cli::{run, Command, OutputFormat, TutorialClient, DEFAULT_BASE_URL};

/// Manage tutorials through the tutorials REST API.
#[derive(Parser, Debug)]
#[command(name = "tutorials", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Base URL of the tutorials API.
    #[arg(long, env = "TUTORIALS_API_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 10, global = true)]
    timeout: u64,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let client = match TutorialClient::new(&cli.base_url, Duration::from_secs(cli.timeout)) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::from(2);
        }
    };
    tracing::debug!(base_url = %client.base_url(), "client configured");

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let mut stdout = std::io::stdout().lock();
    match run(&cli.command, &client, format, &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
