//! Secret service implementation.
//!
//! Reads `secret.json` from the config dir. `GEMINI_API_KEY` in the
//! environment takes precedence over the file.

use std::path::PathBuf;

use livevote_core::config::{GeminiConfig, SecretConfig};
use livevote_core::error::Result;
use livevote_core::secret::SecretService;

use crate::paths::LiveVotePaths;

pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// File-backed secret service with an environment override.
#[derive(Debug, Clone)]
pub struct SecretServiceImpl {
    path: Option<PathBuf>,
    env_api_key: Option<String>,
}

impl SecretServiceImpl {
    pub fn new(paths: &LiveVotePaths) -> Self {
        Self {
            path: paths.secret_file().ok(),
            env_api_key: std::env::var(GEMINI_API_KEY_ENV).ok(),
        }
    }

    /// Uses an explicit secrets file and ignores the environment.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            env_api_key: None,
        }
    }

    fn load_file(&self) -> Result<SecretConfig> {
        let Some(path) = self.path.as_ref().filter(|p| p.exists()) else {
            return Ok(SecretConfig::default());
        };
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl SecretService for SecretServiceImpl {
    fn load_secrets(&self) -> Result<SecretConfig> {
        let mut secrets = self.load_file()?;

        if let Some(api_key) = self.env_api_key.as_ref().filter(|k| !k.trim().is_empty()) {
            let model_name = secrets.gemini.as_ref().and_then(|g| g.model_name.clone());
            secrets.gemini = Some(GeminiConfig {
                api_key: api_key.clone(),
                model_name,
            });
        }

        Ok(secrets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let service = SecretServiceImpl::with_path(temp_dir.path().join("secret.json"));
        assert_eq!(service.load_secrets().unwrap(), SecretConfig::default());
        assert_eq!(service.gemini_api_key(), None);
    }

    #[test]
    fn test_reads_api_key() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        std::fs::write(&path, r#"{"gemini":{"api_key":"abc","model_name":"gemini-x"}}"#).unwrap();

        let service = SecretServiceImpl::with_path(&path);
        assert_eq!(service.gemini_api_key().as_deref(), Some("abc"));
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        std::fs::write(&path, r#"{"gemini":{"api_key":"  "}}"#).unwrap();

        assert_eq!(SecretServiceImpl::with_path(&path).gemini_api_key(), None);
    }

    #[test]
    fn test_env_key_overrides_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        std::fs::write(&path, r#"{"gemini":{"api_key":"file","model_name":"gemini-x"}}"#).unwrap();

        let mut service = SecretServiceImpl::with_path(&path);
        service.env_api_key = Some("env".to_string());

        let secrets = service.load_secrets().unwrap();
        let gemini = secrets.gemini.unwrap();
        assert_eq!(gemini.api_key, "env");
        assert_eq!(gemini.model_name.as_deref(), Some("gemini-x"));
    }
}
