//! # StarGO Core
//!
//! Deterministic game simulation core for StarGO.
//!
//! This crate contains **only** the tick-driven simulation:
//! - No rendering
//! - No wall clock (ticks are advanced by whoever drives the [`simulation::Simulation`])
//! - No unseeded randomness
//! - No floating-point economy math (uses fixed-point)
//!
//! This separation enables:
//! - A headless server that owns the real-time loop
//! - Deterministic tests that call `tick()` directly
//! - Lossless snapshots for persistence
//!
//! ## Crate Structure
//!
//! - [`resources`] - Metal/crystal/energy amounts and affordability
//! - [`clock`] - Tick counter and the cosmetic session countdown
//! - [`research`] - Research catalog, prerequisite graph and per-planet progress
//! - [`queue`] - Completion-tick construction queues
//! - [`buildings`], [`defenses`], [`ships`] - Fixed catalogs and their instances
//! - [`planet`] - The aggregate root and its per-tick update
//! - [`fleet`], [`combat`] - Ships in flight, missions and their resolution
//! - [`simulation`] - Session context: registry of planets and players, tick driver
//! - [`snapshot`] - Versioned save/load of the whole session

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod buildings;
pub mod clock;
pub mod combat;
pub mod defenses;
pub mod error;
pub mod fleet;
pub mod generation;
pub mod location;
pub mod math;
pub mod planet;
pub mod player;
pub mod queue;
pub mod research;
pub mod resources;
pub mod ships;
pub mod simulation;
pub mod snapshot;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::buildings::{Building, BuildingId, BuildingType};
    pub use crate::clock::{Countdown, GameClock, Tick};
    pub use crate::combat::{AttackOutcome, DefensePower};
    pub use crate::defenses::{Defense, DefenseType};
    pub use crate::error::{GameError, Rejection, Result};
    pub use crate::fleet::{Fleet, FleetMission, MissionState, MissionType};
    pub use crate::location::{Location, LocationService};
    pub use crate::math::Fixed;
    pub use crate::planet::{Planet, PlanetEvent, PlanetId};
    pub use crate::player::{Player, PlayerId};
    pub use crate::queue::ConstructionQueue;
    pub use crate::research::{ResearchSystem, ResearchType};
    pub use crate::resources::{ResourceType, Resources};
    pub use crate::ships::{Ship, ShipType};
    pub use crate::simulation::{Command, Simulation, TickEvents};
    pub use crate::snapshot::{Snapshot, SnapshotStore};
}
