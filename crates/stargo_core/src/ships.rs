//! Ship catalog and ship instances.
//!
//! Each class doubles the cost and stats of the previous one and adds one
//! research requirement. A ship's starting health equals its shield
//! strength.

use serde::{Deserialize, Serialize};

use crate::clock::Tick;
use crate::math::{fixed_serde, Fixed};
use crate::research::ResearchType;
use crate::resources::Resources;

/// Unique identifier for a ship within its home planet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShipId(pub u32);

impl ShipId {
    /// Create a new ship ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Ship classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShipType {
    /// Basic ship, no research needed.
    LightFighter,
    /// Needs enhanced hulls.
    HeavyFighter,
    /// Needs hulls and weapons.
    Cruiser,
    /// Needs hulls, weapons and shields.
    Battleship,
}

impl ShipType {
    /// Every ship class, smallest first.
    pub const ALL: [Self; 4] = [
        Self::LightFighter,
        Self::HeavyFighter,
        Self::Cruiser,
        Self::Battleship,
    ];

    /// Human readable name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::LightFighter => "Light Fighter",
            Self::HeavyFighter => "Heavy Fighter",
            Self::Cruiser => "Cruiser",
            Self::Battleship => "Battleship",
        }
    }

    /// Construction cost.
    #[must_use]
    pub fn build_cost(self) -> Resources {
        match self {
            Self::LightFighter => Resources::from_units(3000, 1000, 100),
            Self::HeavyFighter => Resources::from_units(6000, 2000, 200),
            Self::Cruiser => Resources::from_units(12000, 4000, 400),
            Self::Battleship => Resources::from_units(24000, 8000, 800),
        }
    }

    /// Shield strength, which is also the starting health.
    #[must_use]
    pub fn shield_strength(self) -> Fixed {
        Fixed::from_num(match self {
            Self::LightFighter => 100,
            Self::HeavyFighter => 200,
            Self::Cruiser => 400,
            Self::Battleship => 800,
        })
    }

    /// Damage contributed to a fleet attack.
    #[must_use]
    pub fn attack_power(self) -> Fixed {
        Fixed::from_num(match self {
            Self::LightFighter => 150,
            Self::HeavyFighter => 300,
            Self::Cruiser => 600,
            Self::Battleship => 1200,
        })
    }

    /// Research that must be completed on the building planet.
    #[must_use]
    pub const fn required_research(self) -> &'static [ResearchType] {
        match self {
            Self::LightFighter => &[],
            Self::HeavyFighter => &[ResearchType::EnhancedShipHulls],
            Self::Cruiser => &[ResearchType::EnhancedShipHulls, ResearchType::WeaponSystems],
            Self::Battleship => &[
                ResearchType::EnhancedShipHulls,
                ResearchType::WeaponSystems,
                ResearchType::ShieldTechnology,
            ],
        }
    }

    /// Ticks to construct.
    #[must_use]
    pub const fn build_time(self) -> Tick {
        1
    }

    /// Multi-line summary of the research requirements.
    #[must_use]
    pub fn requirements_description(self) -> String {
        let required = self.required_research();
        if required.is_empty() {
            return "Basic ship - No requirements".to_string();
        }

        let mut lines = vec!["Required Research:".to_string()];
        lines.extend(required.iter().map(|research| format!("- {research}")));
        lines.join("\n")
    }
}

impl std::fmt::Display for ShipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A ship, built or under construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ship {
    /// Identifier within the home planet.
    pub id: ShipId,
    /// Ship class.
    pub ship_type: ShipType,
    /// Remaining health; the ship is destroyed at zero.
    #[serde(with = "fixed_serde")]
    pub health: Fixed,
}

impl Ship {
    /// Create a ship at full health.
    #[must_use]
    pub fn new(id: ShipId, ship_type: ShipType) -> Self {
        Self {
            id,
            ship_type,
            health: ship_type.shield_strength(),
        }
    }

    /// Reduce health by `amount`, flooring at zero.
    pub fn take_damage(&mut self, amount: Fixed) {
        self.health = (self.health - amount).max(Fixed::ZERO);
    }

    /// Check whether the ship has no health left.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.health <= Fixed::ZERO
    }

    /// Attack power of this ship.
    #[must_use]
    pub fn attack_power(&self) -> Fixed {
        self.ship_type.attack_power()
    }
}
