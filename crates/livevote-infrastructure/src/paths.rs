//! Unified path management for LiveVote files.
//!
//! ```text
//! ~/.config/livevote/          # Config directory
//! ├── config.toml              # Application configuration
//! └── secret.json              # Commentary API key
//!
//! ~/.local/share/livevote/     # Data directory
//! └── store/                   # Local key-value store, one file per key
//! ```

use std::path::{Path, PathBuf};

const APP_DIR: &str = "livevote";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform directory could not be determined.
    DirNotFound(&'static str),
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::DirNotFound(kind) => write!(f, "Cannot find {} directory", kind),
        }
    }
}

impl std::error::Error for PathError {}

/// Resolves where LiveVote keeps its files.
///
/// With a base path every location lives under it, which is what tests and
/// `--data-dir` use. Without one the platform config/data dirs are used.
#[derive(Debug, Clone, Default)]
pub struct LiveVotePaths {
    base: Option<PathBuf>,
}

impl LiveVotePaths {
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the config directory (e.g. `~/.config/livevote/`).
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base {
            return Ok(base.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::DirNotFound("config"))
    }

    /// Returns the data directory (e.g. `~/.local/share/livevote/`).
    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base {
            return Ok(base.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::DirNotFound("data"))
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    pub fn secret_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("secret.json"))
    }

    /// Default local store directory.
    pub fn store_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("store"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_base_override() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LiveVotePaths::new(Some(temp_dir.path()));

        assert_eq!(paths.config_file().unwrap(), temp_dir.path().join("config.toml"));
        assert_eq!(paths.secret_file().unwrap(), temp_dir.path().join("secret.json"));
        assert_eq!(paths.store_dir().unwrap(), temp_dir.path().join("store"));
    }
}
