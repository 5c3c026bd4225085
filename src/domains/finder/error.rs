//! Finder-specific error types.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors produced by the search and open operations.
///
/// Every variant is terminal for the call that produced it; nothing is
/// retried internally.
#[derive(Debug, Error)]
pub enum FinderError {
    /// The search root or the path to open does not exist.
    #[error("'{}' does not exist", path.display())]
    NotFound { path: PathBuf },

    /// An I/O error while walking the directory tree.
    #[error("Failed to walk '{}': {source}", path.display())]
    Traversal {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The path exists but could not be inspected or resolved.
    #[error("Unable to access '{}': {source}", path.display())]
    Inaccessible {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The name pattern is not a valid glob.
    #[error("Invalid name pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// The editor launcher could not be located or executed.
    #[error("Editor launcher unavailable: {0}")]
    LauncherUnavailable(String),

    /// The editor launcher ran but reported failure.
    #[error("Editor launcher '{}' failed ({status})", program.display())]
    LauncherFailed { program: PathBuf, status: ExitStatus },

    /// The search was cancelled before it finished.
    #[error("Search cancelled")]
    Cancelled,
}

impl FinderError {
    /// Create a new "not found" error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create a new "launcher unavailable" error.
    pub fn launcher_unavailable(msg: impl Into<String>) -> Self {
        Self::LauncherUnavailable(msg.into())
    }

    /// Map an I/O error on `path` to `NotFound` or `Inaccessible`.
    pub(crate) fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Inaccessible { path, source }
        }
    }
}
