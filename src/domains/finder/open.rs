//! Open a file or directory in the editor.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use super::error::FinderError;

/// A request to open `path`, optionally as its containing directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenRequest {
    pub path: PathBuf,
    pub as_directory: bool,
}

impl OpenRequest {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            as_directory: false,
        }
    }

    /// Open the containing directory when `path` is a file.
    pub fn as_directory(mut self, as_directory: bool) -> Self {
        self.as_directory = as_directory;
        self
    }
}

/// Something that can show a path in an editor.
pub trait EditorLauncher: Send + Sync {
    /// Launch the editor on `target` and wait for the launch command to return.
    fn launch(&self, target: &Path) -> Result<(), FinderError>;
}

/// Resolve the absolute path `request` refers to.
///
/// Fails with [`FinderError::NotFound`] when the path does not exist.
pub fn resolve_target(request: &OpenRequest) -> Result<PathBuf, FinderError> {
    let metadata =
        fs::metadata(&request.path).map_err(|e| FinderError::from_io(&request.path, e))?;

    let target = if request.as_directory && !metadata.is_dir() {
        match request.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    } else {
        request.path.as_path()
    };

    // Links are kept as given; no verbatim prefix on Windows.
    std::path::absolute(target).map_err(|e| FinderError::from_io(target, e))
}

/// Open `request` with `launcher`, returning the absolute path passed to it.
///
/// The launcher is never invoked when the path cannot be resolved.
#[instrument(skip(launcher), fields(path = %request.path.display()))]
pub fn open(
    request: &OpenRequest,
    launcher: &dyn EditorLauncher,
) -> Result<PathBuf, FinderError> {
    let target = resolve_target(request)?;
    launcher.launch(&target)?;
    info!("Opened {}", target.display());
    Ok(target)
}
