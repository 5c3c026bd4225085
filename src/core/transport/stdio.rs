//! STDIO transport implementation.
//!
//! Standard input/output transport for MCP - the default and recommended mode.
//! Everything else the process prints (logs, launcher output) must stay off
//! stdout.

use rmcp::ServiceExt;
use tracing::info;

use super::service::shutdown_signal;
use super::{TransportError, TransportResult};
use crate::core::McpServer;

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Run the STDIO transport until the client disconnects or the process
    /// receives a shutdown signal.
    pub async fn run(server: McpServer) -> TransportResult<()> {
        info!("Ready - communicating via stdin/stdout");

        let service = server
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| TransportError::init(e.to_string()))?;

        let cancel = service.cancellation_token();
        tokio::spawn(async move {
            shutdown_signal().await;
            cancel.cancel();
        });

        let reason = service
            .waiting()
            .await
            .map_err(|e| TransportError::ServiceError(e.to_string()))?;

        info!("STDIO transport finished: {:?}", reason);
        Ok(())
    }
}
