use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use livevote_application::{AppBootstrap, BootstrapOptions};
use tracing_subscriber::{EnvFilter, fmt};

mod commands;
mod qr;
mod render;

#[derive(Parser)]
#[command(name = "livevote")]
#[command(about = "LiveVote - live audience voting with a realtime leaderboard", long_about = None)]
struct Cli {
    /// Root directory for config, secrets and the local store
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Explicit config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a participant
    Add {
        name: String,
        /// Photo URL or data URI
        #[arg(default_value = "")]
        photo: String,
    },
    /// Add one participant per photo file
    Ingest {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Remove a participant by id
    Delete { id: String },
    /// Rename the session
    Title { text: String },
    /// Vote from this device, by roster number or participant id
    Vote { target: String },
    /// Clear the roster and this device's vote
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Show the leaderboard
    Results,
    /// Print the public voting link and its QR code
    Url {
        /// Base URL to build the link from instead of the configured one
        #[arg(long)]
        base: Option<String>,
        /// Also save the QR code as a PNG (default: livevote-qr.png)
        #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = qr::DEFAULT_QR_FILE)]
        qr: Option<PathBuf>,
    },
    /// Interactive shell with the admin, vote and results views
    Shell,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("livevote=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let boot = AppBootstrap::initialize(BootstrapOptions {
        data_dir: cli.data_dir,
        config_path: cli.config,
        href: None,
    })?;
    tracing::debug!("Session store at {}", boot.store_dir.display());
    let mut app = boot.usecase;

    match cli.command {
        Commands::Add { name, photo } => commands::admin::add(&mut app, &name, &photo),
        Commands::Ingest { files } => commands::admin::ingest(&mut app, &files)?,
        Commands::Delete { id } => commands::admin::delete(&mut app, &id),
        Commands::Title { text } => commands::admin::title(&mut app, &text),
        Commands::Vote { target } => commands::vote::vote_once(&mut app, &target)?,
        Commands::Reset { yes } => commands::admin::reset(&mut app, yes)?,
        Commands::Results => commands::vote::results(&mut app),
        Commands::Url { base, qr } => commands::admin::url(&mut app, base, qr.as_deref())?,
        Commands::Shell => commands::shell::run(&mut app)?,
    }

    Ok(())
}
