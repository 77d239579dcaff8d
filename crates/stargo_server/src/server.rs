//! The scheduler task.
//!
//! [`GameServer`] owns the [`Simulation`] outright. A `tokio` interval
//! produces ticks and a bounded channel delivers player requests;
//! `select!` interleaves the two, so a command is always applied entirely
//! before or entirely after a tick pass.
//!
//! Late interval ticks are skipped rather than replayed: after a stall the
//! session advances by one tick, not by the wall-clock backlog.

use stargo_core::error::Result as GameResult;
use stargo_core::location::Location;
use stargo_core::planet::PlanetId;
use stargo_core::player::PlayerId;
use stargo_core::simulation::{Command, Simulation};
use stargo_core::snapshot::{Snapshot, SnapshotStore};
use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::geo::SphericalEarth;
use crate::{Result, ServerConfig, ServerError};

/// A player command awaiting application.
#[derive(Debug)]
pub struct CommandRequest {
    /// Issuing player.
    pub player: PlayerId,
    /// What to do.
    pub command: Command,
    /// Receives the outcome.
    pub reply: oneshot::Sender<GameResult<()>>,
}

/// Anything the scheduler task can be asked to do.
#[derive(Debug)]
pub enum Request {
    /// Apply a player command.
    Command(CommandRequest),
    /// Register a new player.
    RegisterPlayer {
        /// Display name.
        name: String,
        /// Receives the new id.
        reply: oneshot::Sender<PlayerId>,
    },
    /// Give a player a located homeworld.
    EstablishHomeworld {
        /// The player.
        player: PlayerId,
        /// Where.
        location: Location,
        /// Receives the new planet id.
        reply: oneshot::Sender<GameResult<PlanetId>>,
    },
    /// Discover planets around a point.
    ScanArea {
        /// Scanning player.
        player: PlayerId,
        /// Scan center.
        center: Location,
        /// Receives the discovered planets.
        reply: oneshot::Sender<GameResult<Vec<PlanetId>>>,
    },
    /// Capture the current state.
    Snapshot {
        /// Receives the snapshot.
        reply: oneshot::Sender<Snapshot>,
    },
    /// Persist and stop.
    Shutdown,
}

/// Cloneable client side of a running [`GameServer`].
#[derive(Debug, Clone)]
pub struct ServerHandle {
    sender: mpsc::Sender<Request>,
}

impl ServerHandle {
    async fn call<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Request) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(build(reply))
            .await
            .map_err(|_| ServerError::Closed)?;
        response.await.map_err(|_| ServerError::Closed)
    }

    /// Apply `command` on behalf of `player`.
    ///
    /// # Errors
    ///
    /// [`ServerError::Game`] if the command was rejected,
    /// [`ServerError::Closed`] if the server stopped.
    pub async fn submit(&self, player: PlayerId, command: Command) -> Result<()> {
        self.call(|reply| {
            Request::Command(CommandRequest {
                player,
                command,
                reply,
            })
        })
        .await??;
        Ok(())
    }

    /// Register a player and return their id.
    ///
    /// # Errors
    ///
    /// [`ServerError::Closed`] if the server stopped.
    pub async fn register_player(&self, name: impl Into<String>) -> Result<PlayerId> {
        let name = name.into();
        self.call(|reply| Request::RegisterPlayer { name, reply })
            .await
    }

    /// Give `player` a located homeworld.
    ///
    /// # Errors
    ///
    /// [`ServerError::Game`] if rejected, [`ServerError::Closed`] if the
    /// server stopped.
    pub async fn establish_homeworld(&self, player: PlayerId, location: Location) -> Result<PlanetId> {
        Ok(self
            .call(|reply| Request::EstablishHomeworld {
                player,
                location,
                reply,
            })
            .await??)
    }

    /// Scan for planets around `center`.
    ///
    /// # Errors
    ///
    /// [`ServerError::Game`] if rejected, [`ServerError::Closed`] if the
    /// server stopped.
    pub async fn scan_area(&self, player: PlayerId, center: Location) -> Result<Vec<PlanetId>> {
        Ok(self
            .call(|reply| Request::ScanArea {
                player,
                center,
                reply,
            })
            .await??)
    }

    /// Capture the current session state.
    ///
    /// # Errors
    ///
    /// [`ServerError::Closed`] if the server stopped.
    pub async fn snapshot(&self) -> Result<Snapshot> {
        self.call(|reply| Request::Snapshot { reply }).await
    }

    /// Ask the server to persist and stop.
    ///
    /// # Errors
    ///
    /// [`ServerError::Closed`] if the server already stopped.
    pub async fn shutdown(&self) -> Result<()> {
        self.sender
            .send(Request::Shutdown)
            .await
            .map_err(|_| ServerError::Closed)
    }
}

/// The scheduler task state.
pub struct GameServer<S> {
    config: ServerConfig,
    simulation: Simulation,
    store: S,
    geo: SphericalEarth,
    requests: mpsc::Receiver<Request>,
    ticks_since_save: u64,
}

impl<S: SnapshotStore> GameServer<S> {
    /// Create a server around `simulation` and a handle to talk to it.
    pub fn new(config: ServerConfig, simulation: Simulation, store: S) -> (Self, ServerHandle) {
        let (sender, requests) = mpsc::channel(config.command_buffer.max(1));
        let server = Self {
            config,
            simulation,
            store,
            geo: SphericalEarth::default(),
            requests,
            ticks_since_save: 0,
        };
        (server, ServerHandle { sender })
    }

    /// The session being served.
    #[must_use]
    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// Run until [`Request::Shutdown`] or `max_ticks`, persist, and return
    /// the final session.
    ///
    /// Once every handle is dropped the server keeps ticking; only
    /// `max_ticks` can stop it then.
    pub async fn run(mut self) -> Simulation {
        let mut interval = tokio::time::interval(self.config.tick_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut accepting = true;

        info!(
            tick = self.simulation.current_tick(),
            interval_ms = self.config.tick_interval_ms,
            max_ticks = ?self.config.max_ticks,
            "Server started"
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.step();
                    if self.reached_limit() {
                        info!(tick = self.simulation.current_tick(), "Tick limit reached");
                        break;
                    }
                }
                request = self.requests.recv(), if accepting => {
                    match request {
                        Some(Request::Shutdown) => {
                            info!(tick = self.simulation.current_tick(), "Shutdown requested");
                            break;
                        }
                        Some(request) => self.handle(request),
                        None => accepting = false,
                    }
                }
            }
        }

        self.persist();
        self.simulation
    }

    fn reached_limit(&self) -> bool {
        self.config
            .max_ticks
            .is_some_and(|max| self.simulation.current_tick() >= max)
    }

    fn step(&mut self) {
        let events = self.simulation.tick();
        for (planet, event) in &events.planet_events {
            debug!(tick = events.tick, %planet, ?event, "Completed");
        }

        self.ticks_since_save += 1;
        if self.ticks_since_save >= self.config.save_interval_ticks.max(1) {
            self.persist();
        }
    }

    fn persist(&mut self) {
        self.ticks_since_save = 0;
        let snapshot = Snapshot::capture(&self.simulation);
        match self.store.save(&snapshot) {
            Ok(()) => debug!(tick = snapshot.saved_at_tick, "Snapshot persisted"),
            Err(e) => warn!(error = %e, tick = snapshot.saved_at_tick, "Snapshot save failed"),
        }
    }

    fn handle(&mut self, request: Request) {
        match request {
            Request::Command(CommandRequest {
                player,
                command,
                reply,
            }) => {
                let result = self.simulation.apply_command(player, command);
                if let Err(e) = &result {
                    debug!(%player, ?command, error = %e, "Command rejected");
                }
                let _ = reply.send(result);
            }
            Request::RegisterPlayer { name, reply } => {
                let _ = reply.send(self.simulation.register_player(&name));
            }
            Request::EstablishHomeworld {
                player,
                location,
                reply,
            } => {
                let _ = reply.send(self.simulation.establish_homeworld(player, location));
            }
            Request::ScanArea {
                player,
                center,
                reply,
            } => {
                let _ = reply.send(self.simulation.scan_area(player, center, &self.geo));
            }
            Request::Snapshot { reply } => {
                let _ = reply.send(Snapshot::capture(&self.simulation));
            }
            Request::Shutdown => {}
        }
    }
}
