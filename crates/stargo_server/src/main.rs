//! StarGO - Game Server

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use stargo_core::simulation::Simulation;
use stargo_core::snapshot::SnapshotStore;
use stargo_server::store::FileSnapshotStore;
use stargo_server::{GameServer, ServerConfig};
use tokio::task::JoinError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "stargo-server")]
#[command(about = "Headless StarGO game server")]
#[command(version)]
struct Cli {
    /// RON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stop after this many ticks (overrides the config)
    #[arg(long)]
    ticks: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    tracing::info!("Starting StarGO server");

    let mut config = match cli.config.as_deref().map(ServerConfig::load).transpose() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(ticks) = cli.ticks {
        config.max_ticks = Some(ticks);
    }

    let store = FileSnapshotStore::new(&config.snapshot_path);
    let simulation = match store.load() {
        Ok(Some(snapshot)) => {
            tracing::info!(
                path = %store.path().display(),
                tick = snapshot.saved_at_tick,
                "Resuming saved session"
            );
            snapshot.into_simulation()
        }
        Ok(None) => {
            tracing::info!(seed = config.seed, "Starting fresh session");
            Simulation::new(config.seed)
        }
        Err(e) => {
            tracing::warn!(error = %e, seed = config.seed, "Snapshot unreadable, starting fresh session");
            Simulation::new(config.seed)
        }
    };

    let (server, handle) = GameServer::new(config, simulation, store);
    let mut task = tokio::spawn(server.run());

    tokio::select! {
        finished = &mut task => report(finished),
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupt received");
            if let Err(e) = handle.shutdown().await {
                tracing::warn!("{e}");
            }
            report(task.await)
        }
    }
}

fn report(finished: Result<Simulation, JoinError>) -> ExitCode {
    match finished {
        Ok(simulation) => {
            tracing::info!(
                tick = simulation.current_tick(),
                planets = simulation.planets().count(),
                players = simulation.players().count(),
                "Server stopped"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Server task failed: {e}");
            ExitCode::FAILURE
        }
    }
}
