//! Tools domain module.
//!
//! MCP tools exposing the finder operations to clients.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `router.rs` - ToolRouter builder for STDIO transport
//! - `registry.rs` - Central tool registry and HTTP dispatch
//! - `handlers.rs` - Blocking execution under a timeout, result helpers
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` (e.g., `my_tool.rs`)
//! 2. Define params, execute(), and http_handler()
//! 3. Export in `definitions/mod.rs`
//! 4. Add route in `router.rs` using `with_route()`
//! 5. Register in `registry.rs` for HTTP support

pub mod definitions;
mod error;
pub mod handlers;
mod registry;
pub mod router;

pub use error::ToolError;
pub use registry::ToolRegistry;
pub use router::build_tool_router;
