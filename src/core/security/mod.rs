// Path confinement for tool calls
//
// When a root directory is configured, every path an MCP client hands us
// must resolve inside it.

pub mod path_validator;

pub use path_validator::{PathSecurityError, symlink_boundary, validate_path};
