//! Editor launcher backed by an external command (VS Code's `code` by default).

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use super::error::FinderError;
use super::open::EditorLauncher;
use crate::core::config::EditorConfig;

/// Launches the editor by running `<program> <path>`.
///
/// The program is resolved on every launch: an explicit override path
/// first, then `<local_dir>/<command>`, then a `PATH` lookup of `<command>`.
#[derive(Debug, Clone)]
pub struct CommandLauncher {
    command: String,
    override_path: Option<PathBuf>,
    local_dir: PathBuf,
}

impl CommandLauncher {
    /// Create a launcher for `command` with no override.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            override_path: None,
            local_dir: PathBuf::from("."),
        }
    }

    /// Create a launcher from the editor configuration.
    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.command.clone()).with_override(config.binary_path.clone())
    }

    /// Use `path` as the editor executable instead of looking it up.
    pub fn with_override(mut self, path: Option<PathBuf>) -> Self {
        self.override_path = path;
        self
    }

    /// Directory checked for a local copy of the command.
    pub fn with_local_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.local_dir = dir.into();
        self
    }

    /// Locate the executable to run.
    pub fn resolve(&self) -> Result<PathBuf, FinderError> {
        if let Some(path) = &self.override_path {
            return if path.is_file() {
                Ok(path.clone())
            } else {
                Err(FinderError::launcher_unavailable(format!(
                    "configured editor binary '{}' does not exist",
                    path.display()
                )))
            };
        }

        let local = self.local_dir.join(&self.command);
        if local.is_file() {
            return Ok(local);
        }

        which::which(&self.command).map_err(|e| {
            FinderError::launcher_unavailable(format!(
                "'{}' not found in PATH ({}). Make sure VS Code is installed and the '{}' \
                 command is available in PATH, or set MCP_EDITOR_BIN",
                self.command, e, self.command
            ))
        })
    }
}

impl EditorLauncher for CommandLauncher {
    fn launch(&self, target: &Path) -> Result<(), FinderError> {
        let program = self.resolve()?;
        debug!("Running {} {}", program.display(), target.display());

        // stdout may be the MCP channel
        let status = Command::new(&program)
            .arg(target)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .status()
            .map_err(|e| {
                FinderError::launcher_unavailable(format!(
                    "failed to execute '{}': {}",
                    program.display(),
                    e
                ))
            })?;

        if !status.success() {
            return Err(FinderError::LauncherFailed { program, status });
        }

        Ok(())
    }
}
