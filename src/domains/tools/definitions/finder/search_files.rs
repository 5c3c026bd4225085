//! Search files tool definition.
//!
//! Walks a directory and reports files whose name matches a glob and/or
//! lines containing a substring.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::core::config::Config;
use crate::core::security::{symlink_boundary, validate_path};
use crate::domains::finder::{SearchQuery, SearchResult, search_cancellable};
use crate::domains::tools::ToolError;
use crate::domains::tools::handlers::{error_result, run_blocking, text_result};

/// Text returned when the search completes without matches.
pub const NO_MATCHES: &str = "(no matches)";

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the search files tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchFilesParams {
    /// Glob or pattern for file names (case-insensitive), e.g. "*_test.go"
    #[serde(default)]
    pub name: String,

    /// Substring / text to search inside files (case-sensitive)
    #[serde(default)]
    pub content: String,

    /// Root directory to start search (default: ".")
    #[serde(default = "default_directory")]
    pub directory: String,
}

fn default_directory() -> String {
    ".".to_string()
}

impl Default for SearchFilesParams {
    fn default() -> Self {
        Self {
            name: String::new(),
            content: String::new(),
            directory: default_directory(),
        }
    }
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Search files tool - finds files by name and/or content.
pub struct SearchFilesTool;

impl SearchFilesTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "search_files";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Search files by name and/or content starting at a directory. \
        Name matches are listed as paths; content matches as 'path:line: text'.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(directory = %params.directory))]
    pub async fn execute(params: &SearchFilesParams, config: &Config) -> CallToolResult {
        info!(
            "Search files tool called: name={:?} content={:?}",
            params.name, params.content
        );

        match Self::run(params, config).await {
            Ok(result) if result.is_empty() => text_result(NO_MATCHES),
            Ok(result) => {
                info!("Found {} matches", result.len());
                text_result(result.to_string())
            }
            Err(e) => error_result(format!("Error searching: {}", e)),
        }
    }

    async fn run(params: &SearchFilesParams, config: &Config) -> Result<SearchResult, ToolError> {
        let directory = match params.directory.trim() {
            "" => ".",
            _ => params.directory.as_str(),
        };
        let root = validate_path(Path::new(directory), &config.security)?;

        let mut query = SearchQuery::new(root).confined_to(symlink_boundary(&config.security)?);
        if !params.name.trim().is_empty() {
            query = query.with_name(params.name.clone());
        }
        if !params.content.trim().is_empty() {
            query = query.with_content(params.content.clone());
        }

        let token = CancellationToken::new();
        let walk_token = token.clone();
        run_blocking(config.tools.timeout(), token, move || {
            Ok(search_cancellable(&query, &walk_token)?)
        })
        .await
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        config: Arc<Config>,
    ) -> Result<serde_json::Value, String> {
        let params: SearchFilesParams = serde_json::from_value(arguments)
            .map_err(|e| ToolError::invalid_arguments(e.to_string()).to_string())?;

        info!("Search files tool (HTTP) called in: {}", params.directory);

        let result = Self::execute(&params, &config).await;
        Ok(crate::domains::tools::handlers::http_result(result))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<SearchFilesParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: Some("Search files".into()),
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
                let params: SearchFilesParams =
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SecurityConfig;
    use std::fs;
    use tempfile::TempDir;

    fn text_of(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            rmcp::model::RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        }
    }

    fn params(directory: &Path) -> SearchFilesParams {
        SearchFilesParams {
            directory: directory.to_string_lossy().to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_search_by_name() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("main.go"), "").unwrap();
        fs::write(temp_dir.path().join("main_test.go"), "").unwrap();

        let params = SearchFilesParams {
            name: "*_test.go".to_string(),
            ..params(temp_dir.path())
        };
        let result = SearchFilesTool::execute(&params, &Config::default()).await;

        assert_ne!(result.is_error, Some(true));
        assert_eq!(
            text_of(&result),
            temp_dir.path().join("main_test.go").to_string_lossy()
        );
    }

    #[tokio::test]
    async fn test_search_no_matches() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.txt"), "hello").unwrap();

        let params = SearchFilesParams {
            content: "absent".to_string(),
            ..params(temp_dir.path())
        };
        let result = SearchFilesTool::execute(&params, &Config::default()).await;

        assert_ne!(result.is_error, Some(true));
        assert_eq!(text_of(&result), NO_MATCHES);
    }

    #[tokio::test]
    async fn test_search_missing_directory_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let params = SearchFilesParams {
            name: "*".to_string(),
            ..params(&temp_dir.path().join("nope"))
        };
        let result = SearchFilesTool::execute(&params, &Config::default()).await;

        assert_eq!(result.is_error, Some(true));
        let text = text_of(&result);
        assert!(text.starts_with("Error searching:"));
        assert!(text.contains("does not exist"));
    }

    #[tokio::test]
    async fn test_search_outside_root_is_rejected() {
        let root = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();

        let mut config = Config::default();
        config.security = SecurityConfig {
            root_path: Some(root.path().to_path_buf()),
            allow_symlinks: true,
        };

        let params = SearchFilesParams {
            name: "*".to_string(),
            ..params(outside.path())
        };
        let result = SearchFilesTool::execute(&params, &config).await;

        assert_eq!(result.is_error, Some(true));
        assert!(text_of(&result).contains("outside allowed root"));
    }

    /// Root with `link.txt -> <outside>/secret.txt` and `linkdir -> <outside>`.
    #[cfg(unix)]
    fn sandbox_with_links(allow_symlinks: bool) -> (TempDir, TempDir, Config) {
        use std::os::unix::fs::symlink;

        let root = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("secret.txt"), "SECRET=hunter2\n").unwrap();
        fs::write(root.path().join("local.txt"), "SECRET=local\n").unwrap();
        symlink(outside.path().join("secret.txt"), root.path().join("link.txt")).unwrap();
        symlink(outside.path(), root.path().join("linkdir")).unwrap();

        let mut config = Config::default();
        config.security = SecurityConfig {
            root_path: Some(root.path().to_path_buf()),
            allow_symlinks,
        };
        (root, outside, config)
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_content_search_does_not_follow_escaping_links() {
        let (root, _outside, config) = sandbox_with_links(false);

        let params = SearchFilesParams {
            content: "SECRET".to_string(),
            ..params(root.path())
        };
        let result = SearchFilesTool::execute(&params, &config).await;

        assert_ne!(result.is_error, Some(true));
        let text = text_of(&result);
        assert!(!text.contains("hunter2"));
        assert!(!text.contains("link.txt"));
        assert!(text.ends_with("local.txt:1: SECRET=local"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_name_search_does_not_list_escaping_links() {
        let (root, _outside, config) = sandbox_with_links(false);

        let params = SearchFilesParams {
            name: "link*".to_string(),
            ..params(root.path())
        };
        let result = SearchFilesTool::execute(&params, &config).await;

        assert_ne!(result.is_error, Some(true));
        assert_eq!(text_of(&result), NO_MATCHES);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_allowed_links_are_searched_but_directory_links_are_not_listed() {
        let (root, _outside, config) = sandbox_with_links(true);

        let params = SearchFilesParams {
            name: "link*".to_string(),
            ..params(root.path())
        };
        let result = SearchFilesTool::execute(&params, &config).await;

        let text = text_of(&result);
        assert!(text.ends_with("link.txt"));
        assert!(!text.contains("linkdir"));
    }

    #[test]
    fn test_params_defaults() {
        let params: SearchFilesParams = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(params.directory, ".");
        assert!(params.name.is_empty());
        assert!(params.content.is_empty());
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_search_http_handler() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("b.txt"), "TODO fix\n").unwrap();

        let args = serde_json::json!({
            "content": "TODO",
            "directory": temp_dir.path().to_string_lossy()
        });
        let result = tokio_test::block_on(SearchFilesTool::http_handler(
            args,
            Arc::new(Config::default()),
        ))
        .unwrap();

        assert_eq!(result["isError"], false);
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_search_http_handler_invalid_params() {
        let args = serde_json::json!({ "name": 42 });
        let result = tokio_test::block_on(SearchFilesTool::http_handler(
            args,
            Arc::new(Config::default()),
        ));
        assert!(result.is_err());
    }
}
