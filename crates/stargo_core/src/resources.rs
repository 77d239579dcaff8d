//! Resource stockpiles and costs.
//!
//! Three fungible currencies back every cost in the game. Spending is
//! all-or-nothing: a cost is either paid in full or not at all.
//!
//! All amounts use fixed-point math for deterministic simulation.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::math::{fixed_serde, Fixed};

/// One of the three currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceType {
    /// Basic construction material.
    Metal,
    /// Advanced technology component.
    Crystal,
    /// Power for buildings and ships.
    Energy,
}

impl ResourceType {
    /// Every resource type, in display order.
    pub const ALL: [Self; 3] = [Self::Metal, Self::Crystal, Self::Energy];

    /// Human readable name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Metal => "Metal",
            Self::Crystal => "Crystal",
            Self::Energy => "Energy",
        }
    }

    /// Short description for UI surfaces.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Metal => "Basic construction material",
            Self::Crystal => "Advanced technology component",
            Self::Energy => "Power for buildings and ships",
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// An amount of each currency. Used both for stockpiles and for costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Resources {
    /// Metal amount.
    #[serde(with = "fixed_serde")]
    pub metal: Fixed,
    /// Crystal amount.
    #[serde(with = "fixed_serde")]
    pub crystal: Fixed,
    /// Energy amount.
    #[serde(with = "fixed_serde")]
    pub energy: Fixed,
}

impl Resources {
    /// Nothing of anything.
    pub const ZERO: Self = Self {
        metal: Fixed::ZERO,
        crystal: Fixed::ZERO,
        energy: Fixed::ZERO,
    };

    /// Create a resource amount from fixed-point values.
    #[must_use]
    pub const fn new(metal: Fixed, crystal: Fixed, energy: Fixed) -> Self {
        Self {
            metal,
            crystal,
            energy,
        }
    }

    /// Create a resource amount from whole units.
    #[must_use]
    pub fn from_units(metal: i32, crystal: i32, energy: i32) -> Self {
        Self::new(
            Fixed::from_num(metal),
            Fixed::from_num(crystal),
            Fixed::from_num(energy),
        )
    }

    /// Amount of a single currency.
    #[must_use]
    pub const fn get(&self, resource: ResourceType) -> Fixed {
        match resource {
            ResourceType::Metal => self.metal,
            ResourceType::Crystal => self.crystal,
            ResourceType::Energy => self.energy,
        }
    }

    /// Mutable access to a single currency.
    pub fn get_mut(&mut self, resource: ResourceType) -> &mut Fixed {
        match resource {
            ResourceType::Metal => &mut self.metal,
            ResourceType::Crystal => &mut self.crystal,
            ResourceType::Energy => &mut self.energy,
        }
    }

    /// Multiply every field by `factor` (saturating).
    #[must_use]
    pub fn scaled(&self, factor: Fixed) -> Self {
        Self::new(
            self.metal.saturating_mul(factor),
            self.crystal.saturating_mul(factor),
            self.energy.saturating_mul(factor),
        )
    }

    /// Check if this stockpile covers `cost` in every currency.
    #[must_use]
    pub fn can_afford(&self, cost: &Self) -> bool {
        self.metal >= cost.metal && self.crystal >= cost.crystal && self.energy >= cost.energy
    }

    /// Pay `cost` from this stockpile.
    ///
    /// Either all three fields are decremented or none are.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InsufficientResources`] naming the first
    /// currency that falls short.
    pub fn subtract(&mut self, cost: &Self) -> Result<()> {
        if let Some(resource) = self.first_shortfall(cost) {
            return Err(GameError::InsufficientResources {
                resource,
                required: cost.get(resource),
                available: self.get(resource),
            });
        }

        self.metal -= cost.metal;
        self.crystal -= cost.crystal;
        self.energy -= cost.energy;
        Ok(())
    }

    /// First currency (in [`ResourceType::ALL`] order) that cannot cover `cost`.
    #[must_use]
    pub fn first_shortfall(&self, cost: &Self) -> Option<ResourceType> {
        ResourceType::ALL
            .into_iter()
            .find(|&resource| self.get(resource) < cost.get(resource))
    }
}

impl std::fmt::Display for Resources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "metal {:.0}, crystal {:.0}, energy {:.0}",
            self.metal, self.crystal, self.energy
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_afford() {
        let stock = Resources::from_units(1000, 500, 100);

        assert!(stock.can_afford(&Resources::from_units(1000, 500, 100)));
        assert!(stock.can_afford(&Resources::ZERO));
        assert!(!stock.can_afford(&Resources::from_units(1001, 0, 0)));
        assert!(!stock.can_afford(&Resources::from_units(0, 0, 101)));
    }

    #[test]
    fn test_subtract_success() {
        let mut stock = Resources::from_units(1000, 500, 100);
        stock.subtract(&Resources::from_units(300, 200, 100)).unwrap();

        assert_eq!(stock, Resources::from_units(700, 300, 0));
    }

    #[test]
    fn test_subtract_is_atomic_on_failure() {
        let mut stock = Resources::from_units(1000, 100, 100);
        let result = stock.subtract(&Resources::from_units(500, 200, 50));

        assert_eq!(
            result,
            Err(GameError::InsufficientResources {
                resource: ResourceType::Crystal,
                required: Fixed::from_num(200),
                available: Fixed::from_num(100),
            })
        );
        // Metal and energy were affordable but must not have been touched
        assert_eq!(stock, Resources::from_units(1000, 100, 100));
    }

    #[test]
    fn test_repeated_fractional_subtraction_has_no_drift() {
        let mut stock = Resources::from_units(10, 10, 10);
        let eighth = Resources::from_units(1, 1, 1).scaled(Fixed::from_num(1) / Fixed::from_num(8));

        for _ in 0..80 {
            stock.subtract(&eighth).unwrap();
        }

        assert_eq!(stock, Resources::ZERO);
        assert!(stock.subtract(&eighth).is_err());
    }

    #[test]
    fn test_scaled() {
        let cost = Resources::from_units(1000, 500, 0);
        assert_eq!(
            cost.scaled(Fixed::from_num(1.5)),
            Resources::from_units(1500, 750, 0)
        );
    }

    #[test]
    fn test_get_and_get_mut() {
        let mut stock = Resources::from_units(1, 2, 3);
        assert_eq!(stock.get(ResourceType::Crystal), Fixed::from_num(2));

        *stock.get_mut(ResourceType::Energy) += Fixed::from_num(4);
        assert_eq!(stock.energy, Fixed::from_num(7));
    }
}
