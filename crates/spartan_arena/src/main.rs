//! Spartan Arena - unified CLI
//!
//! Terminal play or a JSON API over one in-memory session.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use spartan_arena::{ArenaConfig, ArenaSession, OpponentKind, play, runtime, server};
use spartan_tictactoe::Side;
use std::path::Path;
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    initialize_tracing();

    let cli = Cli::parse();

    match cli.command {
        Command::Play { side, opponent } => {
            let config = load_config(&cli.config, side, opponent)?;
            let (handle, events) = start_session(&config)?;
            play::run(handle, events).await
        }
        Command::Serve {
            port,
            host,
            side,
            opponent,
        } => {
            let config = load_config(&cli.config, side, opponent)?;
            let (handle, _) = start_session(&config)?;
            server::serve(handle, host, port).await
        }
    }
}

/// Spawns the session runtime for `config`.
#[instrument(skip(config))]
fn start_session(
    config: &ArenaConfig,
) -> Result<(
    runtime::SessionHandle,
    tokio::sync::mpsc::UnboundedReceiver<spartan_arena::GameEvent>,
)> {
    let provider = config.build_provider()?;
    let session = ArenaSession::new(*config.human_side(), config.tracker());
    Ok(runtime::spawn(session, provider, config.runtime_settings()))
}

#[instrument(skip(config_path))]
fn load_config(
    config_path: &Path,
    side: Option<Side>,
    opponent: Option<OpponentKind>,
) -> Result<ArenaConfig> {
    let mut config = if config_path.exists() {
        ArenaConfig::from_file(config_path)?
    } else {
        info!(
            "Config file not found at {}, using defaults",
            config_path.display()
        );
        ArenaConfig::default()
    };

    if let Some(side) = side {
        info!(%side, "Overriding human side");
        config = config.with_human_side(side);
    }
    if let Some(kind) = opponent {
        info!(?kind, "Overriding opponent");
        config = config.with_opponent_kind(kind);
    }

    Ok(config)
}

/// Logs go to stderr so the terminal board stays readable.
fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,spartan_arena=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
