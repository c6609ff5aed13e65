//! Configuration models.
//!
//! Loaded from `config.toml` and `secret.json` by the infrastructure crate.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::session::model::DEFAULT_SESSION_TITLE;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost/";

/// Root of `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootConfig {
    /// Directory of the local store. `None` means the platform data dir.
    pub storage_dir: Option<PathBuf>,
    /// Title used until the admin sets one
    pub default_title: String,
    /// Base of the public voting link
    pub public_base_url: String,
    pub commentary: CommentaryConfig,
    pub ingest: IngestConfig,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            storage_dir: None,
            default_title: DEFAULT_SESSION_TITLE.to_string(),
            public_base_url: DEFAULT_PUBLIC_BASE_URL.to_string(),
            commentary: CommentaryConfig::default(),
            ingest: IngestConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentaryConfig {
    pub enabled: bool,
    pub model: String,
    /// Quiet period after a leader/total change before asking for commentary
    pub debounce_ms: u64,
    pub timeout_secs: u64,
}

impl Default for CommentaryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            debounce_ms: 3000,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Largest upload accepted before compression, in bytes
    pub max_photo_bytes: u64,
    /// Wider photos are scaled down to this width
    pub max_width: u32,
    /// JPEG quality of the stored photo, 1-100
    pub jpeg_quality: u8,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_photo_bytes: 20 * 1024 * 1024,
            max_width: 800,
            jpeg_quality: 70,
        }
    }
}

/// Root of `secret.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini: Option<GeminiConfig>,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

// Keeps the key out of logs
impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model_name", &self.model_name)
            .finish()
    }
}
