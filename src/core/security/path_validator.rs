use std::io;
use std::path::{Path, PathBuf};

use crate::core::config::SecurityConfig;

/// Errors that can occur during path validation
#[derive(Debug, thiserror::Error)]
pub enum PathSecurityError {
    #[error("Path '{path}' is outside allowed root directory '{root}'")]
    OutsideRootDirectory { path: PathBuf, root: PathBuf },

    #[error("Symlink '{path}' points outside allowed root directory")]
    SymlinkOutsideRoot { path: PathBuf },

    #[error("'{path}' does not exist")]
    PathNotFound { path: PathBuf },

    #[error("IO error for path '{path}': {error}")]
    IoError { path: PathBuf, error: io::Error },
}

/// Confines `input_path` to the configured root directory.
///
/// Without a configured root the path is returned unchanged, so callers keep
/// whatever relative form they were given and existence checks are left to
/// the operation itself.
///
/// With a root configured:
/// 1. The path must exist.
/// 2. If symlinks are disallowed, a symlink whose target resolves outside the
///    root is rejected.
/// 3. The canonical path must lie within the canonical root; it is returned
///    in place of the input.
///
/// # Examples
///
/// ```rust,ignore
/// let config = Config::from_env();
/// let root = validate_path(Path::new("src"), &config.security)?;
/// ```
pub fn validate_path(
    input_path: &Path,
    security: &SecurityConfig,
) -> Result<PathBuf, PathSecurityError> {
    let Some(ref root) = security.root_path else {
        return Ok(input_path.to_path_buf());
    };

    let canonical_root = root.canonicalize().map_err(|e| PathSecurityError::IoError {
        path: root.clone(),
        error: e,
    })?;

    let canonical_path = canonicalize(input_path)?;

    if input_path.is_symlink() && !security.allow_symlinks {
        // canonical_path already follows the link
        if !canonical_path.starts_with(&canonical_root) {
            return Err(PathSecurityError::SymlinkOutsideRoot {
                path: input_path.to_path_buf(),
            });
        }
    }

    if !canonical_path.starts_with(&canonical_root) {
        return Err(PathSecurityError::OutsideRootDirectory {
            path: canonical_path,
            root: canonical_root,
        });
    }

    Ok(canonical_path)
}

/// Canonical root that walked symlinks must stay inside, if any.
///
/// `None` when no root is configured or symlinks are allowed to leave it.
pub fn symlink_boundary(security: &SecurityConfig) -> Result<Option<PathBuf>, PathSecurityError> {
    match &security.root_path {
        Some(root) if !security.allow_symlinks => canonicalize(root).map(Some),
        _ => Ok(None),
    }
}

fn canonicalize(path: &Path) -> Result<PathBuf, PathSecurityError> {
    path.canonicalize().map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            PathSecurityError::PathNotFound {
                path: path.to_path_buf(),
            }
        } else {
            PathSecurityError::IoError {
                path: path.to_path_buf(),
                error: e,
            }
        }
    })
}
