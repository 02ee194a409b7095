use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory under the user config dir shared by every application that
/// embeds the update checker.
const NAMESPACE_DIR: &str = "commonfate";

const LEDGER_SUFFIX: &str = "-update";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PathsError {
    #[error("Could not determine config directory")]
    ConfigDirUnavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    pub config_dir: PathBuf,
}

impl ConfigPaths {
    /// Resolve the shared update-check directory for the current user.
    ///
    /// # Errors
    /// Returns an error when the platform has no per-user config directory.
    pub fn new() -> Result<Self, PathsError> {
        let base = dirs::config_dir().ok_or(PathsError::ConfigDirUnavailable)?;
        Ok(Self::at(base.join(NAMESPACE_DIR)))
    }

    #[must_use]
    pub fn at(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// Path of the ledger file for an application whose identifier has
    /// already been reduced to a safe file stem.
    #[must_use]
    pub fn ledger_file(&self, file_stem: &str) -> PathBuf {
        self.config_dir.join(format!("{file_stem}{LEDGER_SUFFIX}"))
    }

    /// Ensure the config directory exists on disk.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub fn ensure_dir(&self) -> std::io::Result<()> {
        create_private_dir(&self.config_dir)
    }
}

#[cfg(unix)]
fn create_private_dir(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    std::fs::DirBuilder::new()
        .recursive(true)
        .mode(0o700)
        .create(path)
}

#[cfg(not(unix))]
fn create_private_dir(path: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(path)
}
