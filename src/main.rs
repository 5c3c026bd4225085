//! vscode-finder entry point
//!
//! Parses the command line, loads configuration, initializes logging and
//! dispatches to the selected subcommand.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt};

use vscode_finder::cli::{self, Cli};
use vscode_finder::core::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from environment
    let mut config = Config::from_env();
    if !config.logging.explicit {
        config.logging.level = cli.default_log_level().to_string();
    }

    init_logging(&config.logging.level);

    cli.apply(&mut config)?;
    cli::run(cli, config).await?;

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs go to stderr; stdout carries command output and the stdio protocol.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
