//! vscode-finder
//!
//! Search for files by name or content and open them in VS Code, from the
//! command line or as tools of a Model Context Protocol (MCP) server.
//!
//! # Architecture
//!
//! - **cli**: Argument parsing and the `search`, `open` and `serve` commands
//! - **core**: Configuration, error handling, path security, the MCP server
//!   and its transports
//! - **domains**: Business logic organized by bounded contexts
//!   - **finder**: Directory search and editor launching
//!   - **tools**: MCP tools wrapping the finder operations
//!
//! # Example
//!
//! ```rust,no_run
//! use vscode_finder::domains::finder::{SearchQuery, search};
//!
//! fn main() -> anyhow::Result<()> {
//!     let query = SearchQuery::new("src").with_name("*.rs");
//!     println!("{}", search(&query)?);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
