//! # StarGO Server
//!
//! Headless game server.
//!
//! Owns the only wall clock in the system: a single scheduler task turns
//! elapsed time into simulation ticks, applies player commands between
//! ticks, and periodically persists the session.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod geo;
pub mod server;
pub mod store;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use stargo_core::error::GameError;
use thiserror::Error;

pub use server::{CommandRequest, GameServer, Request, ServerHandle};

/// Errors raised by the server layer.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A game operation was rejected.
    #[error(transparent)]
    Game(#[from] GameError),

    /// The scheduler task is gone.
    #[error("Server is not running")]
    Closed,

    /// The config file could not be read.
    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        /// Path that was read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The config file is not valid RON.
    #[error("Invalid config: {0}")]
    ConfigParse(String),
}

/// Result type for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Wall-clock milliseconds per tick.
    pub tick_interval_ms: u64,
    /// Ticks between snapshots.
    pub save_interval_ticks: u64,
    /// Where snapshots are written.
    pub snapshot_path: PathBuf,
    /// Seed for a fresh session.
    pub seed: u64,
    /// Stop after this tick, if set.
    pub max_ticks: Option<u64>,
    /// Capacity of the request channel.
    pub command_buffer: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000 / stargo_core::clock::TICKS_PER_SECOND,
            save_interval_ticks: 5,
            snapshot_path: PathBuf::from("stargo.snapshot"),
            seed: 0,
            max_ticks: None,
            command_buffer: 64,
        }
    }
}

impl ServerConfig {
    /// Load a config from a RON file. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// [`ServerError::ConfigRead`] or [`ServerError::ConfigParse`].
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ServerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&text)
    }

    /// Parse a config from RON text.
    ///
    /// # Errors
    ///
    /// [`ServerError::ConfigParse`] on malformed input.
    pub fn from_ron(text: &str) -> Result<Self> {
        ron::from_str(text).map_err(|e| ServerError::ConfigParse(e.to_string()))
    }

    /// Tick period, never shorter than one millisecond.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}
