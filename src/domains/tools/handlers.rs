//! Shared execution helpers for tool definitions.
//!
//! The finder operations block on the filesystem and on the editor launcher,
//! so tools run them on the blocking pool under the configured timeout.

use std::time::Duration;

use rmcp::model::{CallToolResult, Content};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::error::ToolError;

/// Run `f` on the blocking pool, giving up after `timeout`.
///
/// On timeout `token` is cancelled so a cooperative `f` stops early; the
/// caller gets [`ToolError::Timeout`] either way.
pub async fn run_blocking<T, F>(
    timeout: Duration,
    token: CancellationToken,
    f: F,
) -> Result<T, ToolError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ToolError> + Send + 'static,
{
    let task = tokio::task::spawn_blocking(f);

    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(ToolError::internal(join_error.to_string())),
        Err(_) => {
            token.cancel();
            Err(ToolError::Timeout(timeout.as_secs()))
        }
    }
}

/// A successful single-text result.
pub fn text_result(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

/// An error result whose text is already prefixed for the user.
pub fn error_result(text: impl Into<String>) -> CallToolResult {
    let text = text.into();
    warn!("{}", text);
    CallToolResult::error(vec![Content::text(text)])
}

/// JSON shape of a tool result returned over HTTP.
#[cfg(feature = "http")]
pub fn http_result(result: CallToolResult) -> serde_json::Value {
    serde_json::json!({
        "content": result.content,
        "isError": result.is_error.unwrap_or(false)
    })
}
