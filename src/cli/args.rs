//! CLI argument structs for all subcommands.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Search files by name pattern (glob, case-insensitive)
    #[arg(short, long, default_value = "")]
    pub name: String,

    /// Search files by content (literal, case-sensitive)
    #[arg(short, long, default_value = "")]
    pub content: String,

    /// Directory to search in
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,
}

#[derive(Parser, Debug)]
pub struct OpenArgs {
    /// File or directory to open
    pub path: PathBuf,

    /// Open the containing directory instead of the file
    #[arg(short, long)]
    pub dir: bool,
}

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Serve over HTTP instead of stdio
    #[arg(long)]
    pub http: bool,

    /// HTTP bind host (implies --http)
    #[arg(long)]
    pub host: Option<String>,

    /// HTTP listen port (implies --http)
    #[arg(long)]
    pub port: Option<u16>,

    /// HTTP path to mount the JSON-RPC endpoint on (implies --http)
    #[arg(long)]
    pub path: Option<String>,
}

impl ServeArgs {
    /// Whether any HTTP option was given.
    pub fn wants_http(&self) -> bool {
        self.http || self.host.is_some() || self.port.is_some() || self.path.is_some()
    }
}
