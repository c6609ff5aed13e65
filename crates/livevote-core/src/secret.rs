//! Secret management service trait.
//!
//! Defines the interface for loading the commentary credential.

use crate::config::SecretConfig;

/// Service for loading secret configuration.
///
/// Implementations must never log or echo the secrets they load.
pub trait SecretService: Send + Sync {
    /// Loads the secret configuration.
    ///
    /// A missing secrets file is not an error; it yields an empty config.
    fn load_secrets(&self) -> crate::error::Result<SecretConfig>;

    /// API key for the commentary service, if one is configured.
    fn gemini_api_key(&self) -> Option<String> {
        self.load_secrets()
            .ok()
            .and_then(|s| s.gemini)
            .map(|g| g.api_key)
            .filter(|k| !k.trim().is_empty())
    }
}
