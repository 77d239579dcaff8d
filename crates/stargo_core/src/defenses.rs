//! Planetary defense catalog and instances.

use serde::{Deserialize, Serialize};

use crate::clock::Tick;
use crate::math::{fixed_serde, Fixed};
use crate::resources::Resources;

/// Unique identifier for a defense within its planet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DefenseId(pub u32);

impl DefenseId {
    /// Create a new defense ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Kinds of planetary defense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DefenseType {
    /// Cheap direct-fire turret.
    LaserTurret,
    /// Mid-range missile battery.
    MissileLauncher,
    /// Heavy plasma weapon.
    PlasmaCannon,
    /// Mostly shielding, little firepower.
    ShieldGenerator,
}

impl DefenseType {
    /// Every defense type.
    pub const ALL: [Self; 4] = [
        Self::LaserTurret,
        Self::MissileLauncher,
        Self::PlasmaCannon,
        Self::ShieldGenerator,
    ];

    /// Structure points of a fresh defense.
    #[must_use]
    pub fn max_health(self) -> Fixed {
        Fixed::from_num(match self {
            Self::LaserTurret => 800,
            Self::MissileLauncher => 1000,
            Self::PlasmaCannon => 1200,
            Self::ShieldGenerator => 1500,
        })
    }

    /// Shield contribution to planetary defense power.
    #[must_use]
    pub fn shield_strength(self) -> Fixed {
        Fixed::from_num(match self {
            Self::LaserTurret => 100,
            Self::MissileLauncher => 150,
            Self::PlasmaCannon => 200,
            Self::ShieldGenerator => 500,
        })
    }

    /// Weapon contribution to planetary defense power.
    #[must_use]
    pub fn weapon_power(self) -> Fixed {
        Fixed::from_num(match self {
            Self::LaserTurret => 150,
            Self::MissileLauncher => 200,
            Self::PlasmaCannon => 300,
            Self::ShieldGenerator => 50,
        })
    }

    /// Construction cost.
    #[must_use]
    pub fn build_cost(self) -> Resources {
        match self {
            Self::LaserTurret => Resources::from_units(800, 400, 100),
            Self::MissileLauncher => Resources::from_units(1200, 600, 150),
            Self::PlasmaCannon => Resources::from_units(1500, 800, 200),
            Self::ShieldGenerator => Resources::from_units(2000, 1000, 300),
        }
    }

    /// Ticks to construct.
    #[must_use]
    pub const fn build_ticks(self) -> Tick {
        1
    }

    /// Human readable name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::LaserTurret => "Laser Turret",
            Self::MissileLauncher => "Missile Launcher",
            Self::PlasmaCannon => "Plasma Cannon",
            Self::ShieldGenerator => "Shield Generator",
        }
    }
}

impl std::fmt::Display for DefenseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Maximum number of defenses of each type for a command center level.
#[must_use]
pub const fn defense_limit(command_center_level: u32) -> usize {
    if command_center_level < 5 {
        2
    } else if command_center_level < 10 {
        4
    } else {
        6
    }
}

/// A defense installed on a planet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Defense {
    /// Identifier within the planet.
    pub id: DefenseId,
    /// What kind of defense this is.
    pub defense_type: DefenseType,
    /// Remaining structure points.
    #[serde(with = "fixed_serde")]
    pub health: Fixed,
}

impl Defense {
    /// Create a defense at full health.
    #[must_use]
    pub fn new(id: DefenseId, defense_type: DefenseType) -> Self {
        Self {
            id,
            defense_type,
            health: defense_type.max_health(),
        }
    }
}
