//! Open file tool definition.
//!
//! Opens a file, or the directory containing it, in VS Code.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::core::config::Config;
use crate::core::security::validate_path;
use crate::domains::finder::{CommandLauncher, OpenRequest, open};
use crate::domains::tools::ToolError;
use crate::domains::tools::handlers::{error_result, run_blocking, text_result};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the open file tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct OpenFileParams {
    /// Path to file or directory
    pub path: String,

    /// Open the containing directory instead of the file
    #[serde(default)]
    pub open_dir: bool,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Open file tool - opens a path in the editor.
pub struct OpenFileTool;

impl OpenFileTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "open_file";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Open a file or directory in VS Code (uses the 'code' CLI).";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(path = %params.path, open_dir = params.open_dir))]
    pub async fn execute(params: &OpenFileParams, config: &Config) -> CallToolResult {
        info!("Open file tool called for path: {}", params.path);

        if params.path.trim().is_empty() {
            return error_result("Error: 'path' is required");
        }

        match Self::run(params, config).await {
            Ok(opened) => text_result(format!("Opened in VS Code: {}", opened.display())),
            Err(e) => error_result(format!("Error opening: {}", e)),
        }
    }

    async fn run(params: &OpenFileParams, config: &Config) -> Result<PathBuf, ToolError> {
        let path = validate_path(Path::new(&params.path), &config.security)?;
        let request = OpenRequest::new(path).as_directory(params.open_dir);
        let launcher = CommandLauncher::from_config(&config.editor);

        run_blocking(config.tools.timeout(), CancellationToken::new(), move || {
            Ok(open(&request, &launcher)?)
        })
        .await
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        config: Arc<Config>,
    ) -> Result<serde_json::Value, String> {
        let params: OpenFileParams = serde_json::from_value(arguments)
            .map_err(|e| ToolError::invalid_arguments(e.to_string()).to_string())?;

        info!("Open file tool (HTTP) called for path: {}", params.path);

        let result = Self::execute(&params, &config).await;
        Ok(crate::domains::tools::handlers::http_result(result))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<OpenFileParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: Some("Open in VS Code".into()),
        }
    }

    /// Create a ToolRoute for STDIO transport.
    pub fn create_route<S>(config: Arc<Config>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let config = config.clone();
            async move {
                let params: OpenFileParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &config).await)
            }
            .boxed()
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
