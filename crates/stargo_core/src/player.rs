//! Players and what they know about the map.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::planet::PlanetId;

/// Stable player identity, supplied by the session layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "player#{}", self.0)
    }
}

/// A player. Planets are referenced by id only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    /// Player identifier.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// The planet the player started on.
    pub home_planet: PlanetId,
    /// Planets this player has found.
    pub discovered_planets: BTreeSet<PlanetId>,
}

impl Player {
    /// Create a player with a home planet and nothing discovered.
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>, home_planet: PlanetId) -> Self {
        Self {
            id,
            name: name.into(),
            home_planet,
            discovered_planets: BTreeSet::new(),
        }
    }

    /// Record a discovered planet. Returns `false` if it was already known.
    pub fn discover_planet(&mut self, planet: PlanetId) -> bool {
        self.discovered_planets.insert(planet)
    }

    /// Check whether the player knows about `planet`, including the home planet.
    #[must_use]
    pub fn knows_planet(&self, planet: PlanetId) -> bool {
        planet == self.home_planet || self.discovered_planets.contains(&planet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_planet() {
        let mut player = Player::new(PlayerId(1), "Ada", PlanetId(10));

        assert!(player.knows_planet(PlanetId(10)));
        assert!(!player.knows_planet(PlanetId(11)));

        assert!(player.discover_planet(PlanetId(11)));
        assert!(!player.discover_planet(PlanetId(11)));
        assert!(player.knows_planet(PlanetId(11)));
    }
}
