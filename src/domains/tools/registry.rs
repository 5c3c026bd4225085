//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A registry of all available tools
//! - HTTP dispatch for tool calls (when http feature is enabled)
//! - Tool names for listing

use std::sync::Arc;
#[cfg(feature = "http")]
use tracing::warn;

use crate::core::config::Config;

use super::definitions::{OpenFileTool, SearchFilesTool};

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages all available tools.
pub struct ToolRegistry {
    #[cfg_attr(not(feature = "http"), allow(dead_code))]
    config: Arc<Config>,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        vec![SearchFilesTool::NAME, OpenFileTool::NAME]
    }

    /// Dispatch an HTTP tool call to the appropriate handler.
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, String> {
        match name {
            SearchFilesTool::NAME => {
                SearchFilesTool::http_handler(arguments, self.config.clone()).await
            }
            OpenFileTool::NAME => OpenFileTool::http_handler(arguments, self.config.clone()).await,
            _ => {
                warn!("Unknown tool requested: {}", name);
                Err(super::ToolError::not_found(name).to_string())
            }
        }
    }
}
