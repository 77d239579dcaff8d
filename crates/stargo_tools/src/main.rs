//! StarGO - Development Tools

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "stargo-tools")]
#[command(about = "Development tools for StarGO")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the built-in catalogs
    Validate,
    /// Print a summary of a snapshot file
    Inspect {
        /// Snapshot path (`.ron` for text snapshots)
        path: PathBuf,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate => match stargo_tools::validate::validate_catalogs().into_result() {
            Ok(checks) => {
                tracing::info!("Validation passed ({checks} checks)");
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!("Validation failed: {e}");
                ExitCode::FAILURE
            }
        },
        Commands::Inspect { path, json } => {
            let summary = match stargo_tools::inspect::inspect_file(&path) {
                Ok(summary) => summary,
                Err(e) => {
                    tracing::error!("{e}");
                    return ExitCode::FAILURE;
                }
            };
            if json {
                match serde_json::to_string_pretty(&summary) {
                    Ok(text) => println!("{text}"),
                    Err(e) => {
                        tracing::error!("Failed to encode summary: {e}");
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                print!("{summary}");
            }
            ExitCode::SUCCESS
        }
    }
}
