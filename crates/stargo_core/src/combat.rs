//! Attack resolution and planetary defense power.
//!
//! An attack applies the attacker's full power to a single ship of the
//! target fleet. The ship is picked uniformly at random from the ships that
//! are not yet destroyed, using the caller's seeded RNG.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::fleet::Fleet;
use crate::math::{fixed_serde, percent, Fixed};
use crate::ships::ShipId;

/// Result of one attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttackOutcome {
    /// Ship that took the hit.
    pub target_ship: ShipId,
    /// Damage applied.
    #[serde(with = "fixed_serde")]
    pub damage: Fixed,
    /// Health left after the hit.
    #[serde(with = "fixed_serde")]
    pub remaining_health: Fixed,
    /// Whether the hit destroyed the ship.
    pub destroyed: bool,
}

/// Apply `attack_power` to one random operational ship of `target`.
///
/// Returns `None` and changes nothing when the target has no operational
/// ships.
pub fn resolve_attack<R: Rng + ?Sized>(
    attack_power: Fixed,
    target: &mut Fleet,
    rng: &mut R,
) -> Option<AttackOutcome> {
    let candidates: Vec<usize> = target
        .ships
        .iter()
        .enumerate()
        .filter(|(_, ship)| !ship.is_destroyed())
        .map(|(index, _)| index)
        .collect();

    if candidates.is_empty() {
        return None;
    }

    let index = candidates[rng.gen_range(0..candidates.len())];
    let ship = &mut target.ships[index];
    ship.take_damage(attack_power);

    Some(AttackOutcome {
        target_ship: ship.id,
        damage: attack_power,
        remaining_health: ship.health,
        destroyed: ship.is_destroyed(),
    })
}

/// Aggregate shield and weapon strength of a planet's defenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DefensePower {
    /// Total shield strength.
    #[serde(with = "fixed_serde")]
    pub shield_strength: Fixed,
    /// Total weapon power.
    #[serde(with = "fixed_serde")]
    pub weapon_power: Fixed,
}

impl DefensePower {
    /// Fraction of incoming damage absorbed by shields, between 10% and 90%.
    #[must_use]
    pub fn damage_reduction(&self, attack_power: Fixed) -> Fixed {
        let floor = percent(10);
        let ceiling = percent(90);

        let total = self.shield_strength.saturating_add(attack_power);
        if total <= Fixed::ZERO {
            return floor;
        }
        (self.shield_strength / total).clamp(floor, ceiling)
    }

    /// Damage dealt back to an attacker.
    #[must_use]
    pub const fn counter_attack_damage(&self) -> Fixed {
        self.weapon_power
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::FleetId;
    use crate::ships::{Ship, ShipType};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_light_fighter_destroyed_by_one_hit() {
        let mut target = Fleet::new(FleetId(2));
        target.add_ship(Ship::new(ShipId::new(1), ShipType::LightFighter));
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let outcome = resolve_attack(Fixed::from_num(150), &mut target, &mut rng).unwrap();

        assert_eq!(outcome.target_ship, ShipId::new(1));
        assert_eq!(outcome.remaining_health, Fixed::ZERO);
        assert!(outcome.destroyed);
        assert!(target.ships[0].is_destroyed());
    }

    #[test]
    fn test_empty_target_is_noop() {
        let mut target = Fleet::new(FleetId(2));
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        assert_eq!(resolve_attack(Fixed::from_num(500), &mut target, &mut rng), None);
    }

    #[test]
    fn test_destroyed_ships_are_not_targeted() {
        let mut target = Fleet::new(FleetId(2));
        let mut wreck = Ship::new(ShipId::new(1), ShipType::LightFighter);
        wreck.take_damage(Fixed::from_num(100));
        target.add_ship(wreck);
        target.add_ship(Ship::new(ShipId::new(2), ShipType::Cruiser));

        for seed in 0..20 {
            let mut fleet = target.clone();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let outcome = resolve_attack(Fixed::from_num(10), &mut fleet, &mut rng).unwrap();
            assert_eq!(outcome.target_ship, ShipId::new(2));
        }
    }

    #[test]
    fn test_all_destroyed_is_noop() {
        let mut target = Fleet::new(FleetId(2));
        let mut wreck = Ship::new(ShipId::new(1), ShipType::LightFighter);
        wreck.take_damage(Fixed::from_num(100));
        target.add_ship(wreck);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        assert_eq!(resolve_attack(Fixed::from_num(10), &mut target, &mut rng), None);
    }

    #[test]
    fn test_damage_reduction_clamped() {
        let power = DefensePower {
            shield_strength: Fixed::from_num(100),
            weapon_power: Fixed::from_num(150),
        };
        assert_eq!(power.damage_reduction(Fixed::from_num(100)), Fixed::from_num(0.5));
        assert_eq!(power.damage_reduction(Fixed::from_num(100_000)), percent(10));
        assert_eq!(power.damage_reduction(Fixed::ZERO), percent(90));
        assert_eq!(power.counter_attack_damage(), Fixed::from_num(150));

        assert_eq!(DefensePower::default().damage_reduction(Fixed::ZERO), percent(10));
    }
}
