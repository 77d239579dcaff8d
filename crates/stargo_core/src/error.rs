//! Error types for the game simulation.
//!
//! Every failure here is recoverable: an operation that returns an error
//! has not mutated any state, and the tick loop keeps running.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::math::Fixed;
use crate::planet::PlanetId;
use crate::player::PlayerId;
use crate::resources::ResourceType;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for all game simulation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    /// A cost could not be paid from the available stockpile.
    #[error("Insufficient resources: need {required} {resource}, have {available}")]
    InsufficientResources {
        /// First resource that falls short.
        resource: ResourceType,
        /// Amount required.
        required: Fixed,
        /// Amount available.
        available: Fixed,
    },

    /// A structural precondition of the operation does not hold.
    #[error("Invalid operation: {0}")]
    InvalidOperation(Rejection),

    /// No planet with this identifier is registered.
    #[error("Planet not found: {0}")]
    PlanetNotFound(PlanetId),

    /// No player with this identifier is registered.
    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),

    /// Saved state could not be read back.
    #[error("Failed to load game data: {0}")]
    LoadFailed(String),

    /// State could not be made durable.
    #[error("Failed to save game data: {0}")]
    SaveFailed(String),

    /// The location collaborator could not resolve a position.
    #[error("Could not find valid location: {0}")]
    InvalidLocation(String),

    /// A fixed catalog is internally inconsistent.
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),
}

/// Reason a structurally invalid operation was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum Rejection {
    /// A building of this type is already in the construction queue.
    #[error("Building is already under construction")]
    BuildingAlreadyQueued,
    /// The building is already being upgraded.
    #[error("Upgrade already in progress")]
    UpgradeInProgress,
    /// The referenced building does not exist on this planet.
    #[error("Building not found")]
    BuildingNotFound,
    /// Defenses need a command center.
    #[error("A command center is required")]
    MissingCommandCenter,
    /// The per-type defense limit for the command center level is reached.
    #[error("Defense limit reached")]
    DefenseLimitReached,
    /// Ships need a shipyard.
    #[error("A shipyard is required")]
    MissingShipyard,
    /// The ship type requires research that is not completed.
    #[error("Required research not completed")]
    ResearchLocked,
    /// The research is completed, in progress, or blocked by prerequisites.
    #[error("Research is not available")]
    ResearchUnavailable,
    /// Another research is already active on the planet.
    #[error("Another research is already in progress")]
    ResearchSlotBusy,
    /// The fleet already has a pending mission.
    #[error("Fleet is already on a mission")]
    MissionInProgress,
    /// The target planet is inside its protection period.
    #[error("Target planet is protected")]
    TargetProtected,
    /// The mission target is not a valid destination.
    #[error("Invalid mission target")]
    InvalidTarget,
    /// The fleet has no operational ships.
    #[error("Fleet has no operational ships")]
    EmptyFleet,
    /// The player does not own the planet.
    #[error("Planet is not owned by this player")]
    NotOwner,
    /// The player already has a located home planet.
    #[error("Home planet already established")]
    HomeworldAlreadyExists,
}

impl From<Rejection> for GameError {
    fn from(reason: Rejection) -> Self {
        Self::InvalidOperation(reason)
    }
}
