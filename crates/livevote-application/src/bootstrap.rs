//! Wires configuration, storage and commentary into a [`VotingUseCase`].

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use livevote_core::config::RootConfig;
use livevote_core::secret::SecretService;
use livevote_core::session::SessionStore;
use livevote_core::view::Location;
use livevote_infrastructure::{ConfigService, FileKeyValueStore, LiveVotePaths, SecretServiceImpl};
use livevote_interaction::{CommentaryScheduler, GeminiApiAgent};

use crate::photo_ingest::PhotoIngestor;
use crate::voting_usecase::VotingUseCase;

/// Where to look for configuration and data.
#[derive(Debug, Clone, Default)]
pub struct BootstrapOptions {
    /// Root for config, secrets and the store. Platform dirs when `None`.
    pub data_dir: Option<PathBuf>,
    /// Explicit `config.toml`, overriding the one under the config dir.
    pub config_path: Option<PathBuf>,
    /// Initial location, e.g. `https://host/app/#vote`.
    pub href: Option<String>,
}

pub struct AppBootstrap {
    pub usecase: VotingUseCase,
    pub config: RootConfig,
    pub store_dir: PathBuf,
}

impl AppBootstrap {
    /// Loads configuration and the persisted session.
    ///
    /// Commentary is only wired when it is enabled and an API key is
    /// configured. Must run inside a tokio runtime when commentary may be
    /// enabled.
    pub fn initialize(options: BootstrapOptions) -> Result<Self> {
        let paths = LiveVotePaths::new(options.data_dir.as_deref());

        let config_service = match options.config_path {
            Some(path) => ConfigService::with_path(path),
            None => ConfigService::new(&paths),
        };
        let config = config_service.get_config();

        let store_dir = match config.storage_dir.clone() {
            Some(dir) => dir,
            None => paths
                .store_dir()
                .context("Failed to resolve the local store directory")?,
        };
        tracing::info!("[Bootstrap] Using store at {}", store_dir.display());

        let storage = Arc::new(FileKeyValueStore::new(store_dir.clone()));
        let store = SessionStore::load_with_default_title(storage, config.default_title.clone());

        let location = match options.href.as_deref() {
            Some(href) => Location::new(href),
            None => Location::new(&config.public_base_url),
        };

        let mut usecase = VotingUseCase::new(store, location)
            .with_public_base_url(config.public_base_url.clone())
            .with_ingestor(PhotoIngestor::from_config(&config.ingest));

        if let Some(scheduler) = build_commentary(&config, &SecretServiceImpl::new(&paths)) {
            usecase = usecase.with_commentary(scheduler);
        }

        Ok(Self {
            usecase,
            config,
            store_dir,
        })
    }
}

fn build_commentary(
    config: &RootConfig,
    secrets: &dyn SecretService,
) -> Option<CommentaryScheduler> {
    if !config.commentary.enabled {
        tracing::info!("[Bootstrap] Commentary disabled by config");
        return None;
    }

    let timeout = Duration::from_secs(config.commentary.timeout_secs);
    let Some(agent) = GeminiApiAgent::from_secrets(secrets, &config.commentary.model) else {
        tracing::info!("[Bootstrap] No Gemini API key configured, commentary disabled");
        return None;
    };
    let agent = agent.with_timeout(timeout);
    tracing::info!("[Bootstrap] Commentary enabled with model {}", agent.model());

    Some(CommentaryScheduler::new(
        Arc::new(agent),
        Duration::from_millis(config.commentary.debounce_ms),
        timeout,
    ))
}
