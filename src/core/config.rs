//! Configuration management for vscode-finder.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables (optionally via a `.env` file) or
//! defaults. Command-line flags are applied on top by the CLI.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Main configuration structure.
///
/// This struct contains all configurable aspects of the server, organized
/// by concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Security and path validation configuration.
    pub security: SecurityConfig,

    /// Editor launcher configuration.
    pub editor: EditorConfig,

    /// Tool execution limits.
    pub tools: ToolsConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether `level` was set explicitly rather than defaulted.
    #[serde(skip)]
    pub explicit: bool,
}

/// Configuration for security and path validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Optional root directory for tool calls.
    /// If None, no path restrictions are enforced.
    pub root_path: Option<PathBuf>,

    /// Whether symlinks may point outside the root.
    pub allow_symlinks: bool,
}

/// Configuration for the external editor launcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Command name looked up locally and in `PATH`.
    pub command: String,

    /// Explicit executable path; skips the lookup when set.
    pub binary_path: Option<PathBuf>,
}

/// Limits applied to MCP tool calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Maximum time a single tool call may take, in seconds.
    pub timeout_secs: u64,
}

impl ToolsConfig {
    /// The timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            root_path: None,
            allow_symlinks: true,
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            command: "code".to_string(),
            binary_path: None,
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "vscode-finder".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                explicit: false,
            },
            transport: TransportConfig::default(),
            security: SecurityConfig::default(),
            editor: EditorConfig::default(),
            tools: ToolsConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`, `MCP_EDITOR_BIN`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
            config.logging.explicit = true;
        }

        config.transport = TransportConfig::from_env();

        if let Ok(root_path) = std::env::var("MCP_ROOT_PATH") {
            config.security.root_path = Some(PathBuf::from(root_path));
        }

        if let Ok(allow_symlinks) = std::env::var("MCP_ALLOW_SYMLINKS") {
            config.security.allow_symlinks = allow_symlinks.parse().unwrap_or(true);
        }

        if let Ok(command) = std::env::var("MCP_EDITOR_COMMAND") {
            if !command.trim().is_empty() {
                config.editor.command = command.trim().to_string();
            }
        }

        if let Ok(bin) = std::env::var("MCP_EDITOR_BIN") {
            if !bin.trim().is_empty() {
                config.editor.binary_path = Some(PathBuf::from(bin.trim()));
            }
        }

        if let Ok(timeout) = std::env::var("MCP_TOOL_TIMEOUT_SECS") {
            match timeout.parse() {
                Ok(secs) if secs > 0 => config.tools.timeout_secs = secs,
                _ => warn!("Ignoring invalid MCP_TOOL_TIMEOUT_SECS: {}", timeout),
            }
        }

        config
    }

    /// Log the settings that change tool behaviour.
    ///
    /// Called once the subscriber is installed, so it is separate from
    /// [`Config::from_env`].
    pub fn log_summary(&self) {
        match &self.security.root_path {
            Some(root) => info!("Path security enabled: root directory set to {:?}", root),
            None => warn!(
                "MCP_ROOT_PATH not set - no path restrictions active. \
                 All filesystem paths will be allowed."
            ),
        }
        match &self.editor.binary_path {
            Some(bin) => info!("Editor launcher: {}", bin.display()),
            None => info!("Editor launcher: '{}' (local directory, then PATH)", self.editor.command),
        }
        info!("Tool timeout: {}s", self.tools.timeout_secs);
    }
}
