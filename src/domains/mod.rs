//! Domains module containing business logic organized by bounded contexts.
//!
//! - **finder**: the search and open operations
//! - **tools**: MCP tools wrapping the finder operations

pub mod finder;
pub mod tools;
