//! Fleets and fleet missions.
//!
//! Each planet owns exactly one fleet. Ships wait in the fleet's
//! construction queue until their completion tick, then join the fleet.
//! A fleet carries at most one mission; a mission resolves exactly once,
//! on the first tick at or after `start_tick + duration`.

use serde::{Deserialize, Serialize};

use crate::clock::Tick;
use crate::math::Fixed;
use crate::planet::PlanetId;
use crate::queue::ConstructionQueue;
use crate::ships::{Ship, ShipType};

/// Unique identifier for a fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FleetId(pub u32);

/// What a mission does when it arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissionType {
    /// Damage a ship of the target fleet.
    Attack,
    /// Reconnaissance; no effect on arrival.
    Scout,
    /// Reinforcement; no effect on arrival.
    Defend,
    /// Resource delivery; no effect on arrival.
    Transport,
}

impl std::fmt::Display for MissionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Attack => write!(f, "Attack"),
            Self::Scout => write!(f, "Scout"),
            Self::Defend => write!(f, "Defend"),
            Self::Transport => write!(f, "Transport"),
        }
    }
}

/// Stored resolution status of a mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissionStatus {
    /// Not yet resolved.
    Pending,
    /// Effects applied; terminal.
    Resolved,
}

/// Observed state of a mission at a given tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissionState {
    /// Still travelling.
    Pending,
    /// Arrived but not yet resolved.
    CompleteUnresolved,
    /// Effects applied.
    Resolved,
}

/// A mission from one planet to another.
///
/// Planets are referenced by id; the mission never owns either of them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FleetMission {
    /// What happens on arrival.
    pub mission_type: MissionType,
    /// Planet whose fleet is on the mission.
    pub source: PlanetId,
    /// Destination planet.
    pub target: PlanetId,
    /// Tick the mission was launched.
    pub start_tick: Tick,
    /// Travel time in ticks.
    pub duration: Tick,
    /// Whether the effects were applied.
    pub status: MissionStatus,
}

impl FleetMission {
    /// Create a pending mission.
    #[must_use]
    pub const fn new(
        mission_type: MissionType,
        source: PlanetId,
        target: PlanetId,
        start_tick: Tick,
        duration: Tick,
    ) -> Self {
        Self {
            mission_type,
            source,
            target,
            start_tick,
            duration,
            status: MissionStatus::Pending,
        }
    }

    /// Tick at which the mission arrives.
    #[must_use]
    pub const fn completion_tick(&self) -> Tick {
        self.start_tick.saturating_add(self.duration)
    }

    /// Check whether the mission has arrived by `tick`.
    #[must_use]
    pub const fn is_complete(&self, tick: Tick) -> bool {
        tick >= self.completion_tick()
    }

    /// Observed state at `tick`.
    #[must_use]
    pub const fn state(&self, tick: Tick) -> MissionState {
        match self.status {
            MissionStatus::Resolved => MissionState::Resolved,
            MissionStatus::Pending if self.is_complete(tick) => MissionState::CompleteUnresolved,
            MissionStatus::Pending => MissionState::Pending,
        }
    }

    /// Mark the mission resolved. Returns `false` if it already was.
    pub fn mark_resolved(&mut self) -> bool {
        if self.status == MissionStatus::Resolved {
            return false;
        }
        self.status = MissionStatus::Resolved;
        true
    }
}

/// The ships stationed at one planet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fleet {
    /// Fleet identifier.
    pub id: FleetId,
    /// Built ships, including destroyed ones until pruned.
    pub ships: Vec<Ship>,
    /// Ships under construction.
    pub construction_queue: ConstructionQueue<Ship>,
    /// Current or last mission.
    pub mission: Option<FleetMission>,
}

impl Fleet {
    /// Create an empty fleet.
    #[must_use]
    pub const fn new(id: FleetId) -> Self {
        Self {
            id,
            ships: Vec::new(),
            construction_queue: ConstructionQueue::new(),
            mission: None,
        }
    }

    /// Add a finished ship.
    pub fn add_ship(&mut self, ship: Ship) {
        self.ships.push(ship);
    }

    /// Queue a ship to join at `completion_tick`.
    pub fn add_to_construction_queue(&mut self, ship: Ship, completion_tick: Tick) {
        self.construction_queue.enqueue(ship, completion_tick);
    }

    /// Move every due ship into the fleet. Returns the ships that joined.
    pub fn update(&mut self, tick: Tick) -> Vec<Ship> {
        let completed = self.construction_queue.drain_completed(tick);
        self.ships.extend(completed.iter().cloned());
        completed
    }

    /// Combined attack power of ships that are not destroyed.
    #[must_use]
    pub fn total_attack_power(&self) -> Fixed {
        self.active_ships()
            .fold(Fixed::ZERO, |total, ship| total.saturating_add(ship.attack_power()))
    }

    /// Ships that are not destroyed.
    pub fn active_ships(&self) -> impl Iterator<Item = &Ship> {
        self.ships.iter().filter(|ship| !ship.is_destroyed())
    }

    /// Number of ships that are not destroyed.
    #[must_use]
    pub fn active_ship_count(&self) -> usize {
        self.active_ships().count()
    }

    /// Remove destroyed ships. Returns how many were removed.
    pub fn prune_destroyed(&mut self) -> usize {
        let before = self.ships.len();
        self.ships.retain(|ship| !ship.is_destroyed());
        before - self.ships.len()
    }

    /// Check whether any ship is under construction.
    #[must_use]
    pub fn is_constructing(&self) -> bool {
        !self.construction_queue.is_empty()
    }

    /// Ticks until the first queued ship of `ship_type` completes.
    #[must_use]
    pub fn construction_time_remaining(&self, ship_type: ShipType, now: Tick) -> Option<Tick> {
        self.construction_queue
            .time_remaining(|ship| ship.ship_type == ship_type, now)
    }

    /// Check whether a mission is launched and not yet resolved.
    #[must_use]
    pub fn has_active_mission(&self) -> bool {
        self.mission
            .as_ref()
            .is_some_and(|mission| mission.status == MissionStatus::Pending)
    }
}
