//! Configuration service implementation.
//!
//! Loads the root configuration from `config.toml`.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use livevote_core::config::RootConfig;
use livevote_core::error::Result;

use crate::paths::LiveVotePaths;

/// Loads and caches the root configuration.
///
/// A missing file yields defaults. An unreadable or invalid file is logged
/// and also yields defaults, so a broken config never blocks startup.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: Option<PathBuf>,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<RootConfig>>>,
}

impl ConfigService {
    /// Uses `config.toml` in the config dir resolved by `paths`.
    pub fn new(paths: &LiveVotePaths) -> Self {
        let path = match paths.config_file() {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!("No config location available: {}", e);
                None
            }
        };
        Self {
            path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Uses an explicit config file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the root configuration, loading from file if not cached.
    pub fn get_config(&self) -> RootConfig {
        if let Ok(read_lock) = self.config.read()
            && let Some(cached) = read_lock.as_ref()
        {
            return cached.clone();
        }

        let loaded = match self.path.as_deref().map(Self::load_config) {
            Some(Ok(config)) => config,
            Some(Err(e)) => {
                tracing::warn!("Ignoring unreadable config, using defaults: {}", e);
                RootConfig::default()
            }
            None => RootConfig::default(),
        };

        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = Some(loaded.clone());
        }

        loaded
    }

    fn load_config(path: &Path) -> Result<RootConfig> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(RootConfig::default());
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(RootConfig::default());
        }

        Ok(toml::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(&LiveVotePaths::new(Some(temp_dir.path())));
        assert_eq!(service.get_config(), RootConfig::default());
    }

    #[test]
    fn test_reads_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            default_title = "Finals"
            public_base_url = "https://example.github.io/vote/"

            [commentary]
            enabled = false
            "#,
        )
        .unwrap();

        let config = ConfigService::with_path(&path).get_config();
        assert_eq!(config.default_title, "Finals");
        assert_eq!(config.public_base_url, "https://example.github.io/vote/");
        assert!(!config.commentary.enabled);
    }

    #[test]
    fn test_invalid_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "default_title = [").unwrap();

        assert_eq!(ConfigService::with_path(&path).get_config(), RootConfig::default());
    }

    #[test]
    fn test_config_is_cached() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let service = ConfigService::with_path(&path);
        assert_eq!(service.get_config().default_title, RootConfig::default().default_title);

        std::fs::write(&path, "default_title = \"Later\"").unwrap();
        assert_ne!(service.get_config().default_title, "Later");
        assert_eq!(ConfigService::with_path(&path).get_config().default_title, "Later");
    }
}
