//! CLI layer: argument parsing and subcommand dispatch.

pub mod args;

pub use args::*;

use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

use crate::core::{Config, McpServer, Result, TransportConfig, TransportService};
use crate::domains::finder::{CommandLauncher, OpenRequest, SearchQuery, open, search};

// ─── CLI ─────────────────────────────────────────────────────────────

/// A CLI tool to search and open files in VS Code
#[derive(Parser, Debug)]
#[command(
    name = "vscode-finder",
    version,
    about,
    long_about = "vscode-finder lets you search for files by name or content, \
                  and open them directly in VS Code. `serve` exposes the same \
                  operations as MCP tools."
)]
pub struct Cli {
    /// Editor executable to run instead of looking up `code`
    #[arg(long, global = true)]
    pub editor: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search for files by name or content
    Search(SearchArgs),

    /// Open a file or directory in VS Code
    Open(OpenArgs),

    /// Start the MCP server (stdio unless HTTP options are given)
    Serve(ServeArgs),
}

impl Cli {
    /// Apply command-line overrides on top of `config`.
    pub fn apply(&self, config: &mut Config) -> Result<()> {
        if let Some(editor) = &self.editor {
            config.editor.binary_path = Some(editor.clone());
        }
        if let Commands::Serve(args) = &self.command {
            config.transport = transport_for(args, config.transport.clone())?;
        }
        Ok(())
    }

    /// Log level used when `MCP_LOG_LEVEL` is not set.
    ///
    /// One-shot commands stay quiet so their stdout is just the results.
    pub fn default_log_level(&self) -> &'static str {
        match self.command {
            Commands::Serve(_) => "info",
            _ => "warn",
        }
    }
}

// ─── Main entry point ───────────────────────────────────────────────

/// Run the parsed command.
pub async fn run(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Search(args) => cmd_search(&args, &mut io::stdout().lock()),
        Commands::Open(args) => cmd_open(&args, &config, &mut io::stdout().lock()),
        Commands::Serve(_) => cmd_serve(config).await,
    }
}

// ─── Commands ───────────────────────────────────────────────────────

fn cmd_search(args: &SearchArgs, out: &mut impl Write) -> Result<()> {
    let query = SearchQuery::new(&args.dir)
        .with_name(args.name.clone())
        .with_content(args.content.clone());
    let result = search(&query)?;

    writeln!(out, "Searching in: {}", args.dir.display())?;
    if result.is_empty() {
        writeln!(out, "No matches found")?;
    } else {
        writeln!(out, "{}", result)?;
    }
    Ok(())
}

fn cmd_open(args: &OpenArgs, config: &Config, out: &mut impl Write) -> Result<()> {
    let launcher = CommandLauncher::from_config(&config.editor);
    let request = OpenRequest::new(&args.path).as_directory(args.dir);
    let opened = open(&request, &launcher)?;

    writeln!(out, "Opened in VS Code: {}", opened.display())?;
    Ok(())
}

async fn cmd_serve(config: Config) -> Result<()> {
    info!("Starting {} v{}", config.server.name, config.server.version);
    config.log_summary();

    let transport = TransportService::new(config.transport.clone());
    let server = McpServer::new(config);

    info!("Server initialized");
    transport.run(server).await?;
    info!("Server shutting down");

    Ok(())
}

/// Resolve the transport for `serve` from its flags and the env-derived base.
fn transport_for(args: &ServeArgs, base: TransportConfig) -> Result<TransportConfig> {
    if !args.wants_http() {
        return Ok(base);
    }

    #[cfg(feature = "http")]
    {
        use crate::core::transport::{HttpConfig, normalize_rpc_path};

        #[allow(irrefutable_let_patterns)]
        let mut http = if let TransportConfig::Http(cfg) = base {
            cfg
        } else {
            HttpConfig::default()
        };
        if let Some(host) = &args.host {
            http.host = host.clone();
        }
        if let Some(port) = args.port {
            http.port = port;
        }
        if let Some(path) = &args.path {
            http.rpc_path = normalize_rpc_path(path);
        }
        Ok(TransportConfig::Http(http))
    }

    #[cfg(not(feature = "http"))]
    {
        let _ = base;
        Err(crate::core::Error::config(
            "this build has no HTTP transport; rebuild with --features http",
        ))
    }
}
