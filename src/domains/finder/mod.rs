//! Finder domain: the search and open operations.
//!
//! Both operations are synchronous and stateless. Callers build an immutable
//! [`SearchQuery`] or [`OpenRequest`] and pass it in; nothing is kept between
//! calls.
//!
//! - `search.rs` - recursive walk with name-glob and content-substring matching
//! - `open.rs` - path resolution and the [`EditorLauncher`] seam
//! - `launcher.rs` - the command-backed launcher and its lookup policy
//! - `error.rs` - [`FinderError`]

mod error;
pub mod launcher;
pub mod open;
pub mod search;

pub use error::FinderError;
pub use launcher::CommandLauncher;
pub use open::{EditorLauncher, OpenRequest, open, resolve_target};
pub use search::{SearchMatch, SearchQuery, SearchResult, search, search_cancellable};
