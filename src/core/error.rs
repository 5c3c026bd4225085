//! Error types and handling for vscode-finder.
//!
//! This module defines a unified error type that can represent errors from
//! all domains and external dependencies, providing consistent error handling
//! across the CLI and the MCP server.

use thiserror::Error;

/// A specialized Result type for vscode-finder operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Error from a search or open operation.
    #[error(transparent)]
    Finder(#[from] crate::domains::finder::FinderError),

    /// Error from the transport layer.
    #[error("Transport error: {0}")]
    Transport(#[from] super::transport::TransportError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors from file operations or network communication.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
