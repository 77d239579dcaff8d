//! Test fixtures and helpers.
//!
//! Pre-built planets and sessions for consistent testing.

use fixed::types::I32F32;
use rand::{Rng, RngCore};
use stargo_core::buildings::BuildingType;
use stargo_core::location::{Location, LocationService};
use stargo_core::planet::{Planet, PlanetId};
use stargo_core::player::PlayerId;
use stargo_core::research::ResearchType;
use stargo_core::resources::Resources;
use stargo_core::ships::{Ship, ShipId, ShipType};
use stargo_core::simulation::Simulation;

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// Create a fixed-point number from a float (for tests only).
///
/// Note: In real simulation code, never use floats.
/// This is only for convenient test setup.
#[must_use]
pub fn fixed_f(n: f64) -> I32F32 {
    I32F32::from_num(n)
}

/// Flat-plane geometry: one degree of latitude or longitude is one
/// kilometre, distances are Euclidean.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatGeo;

impl LocationService for FlatGeo {
    fn distance_km(&self, a: Location, b: Location) -> f64 {
        let dlat = a.latitude - b.latitude;
        let dlon = a.longitude - b.longitude;
        (dlat * dlat + dlon * dlon).sqrt()
    }

    fn random_near(&self, center: Location, radius_km: f64, rng: &mut dyn RngCore) -> Location {
        Location::new(
            center.latitude + rng.gen_range(-radius_km..=radius_km),
            center.longitude + rng.gen_range(-radius_km..=radius_km),
        )
    }
}

/// A bare planet with enough resources for anything in the catalogs.
#[must_use]
pub fn rich_planet(id: u32) -> Planet {
    let mut planet = Planet::new(PlanetId(id), format!("Rich-{id}"), 0);
    planet.resources = Resources::from_units(1_000_000, 1_000_000, 1_000_000);
    planet
}

/// A rich planet with a level-1 command center and shipyard.
#[must_use]
pub fn developed_planet(id: u32) -> Planet {
    let mut planet = rich_planet(id);
    planet.place_building(BuildingType::CommandCenter, 1);
    planet.place_building(BuildingType::Shipyard, 1);
    planet
}

/// Complete `research` (and everything it depends on) on `planet`,
/// one tick per item starting at `tick`. Returns the next free tick.
pub fn complete_research(planet: &mut Planet, research: ResearchType, mut tick: u64) -> u64 {
    for required in research.prerequisites() {
        if !planet.research.is_researched(*required) {
            tick = complete_research(planet, *required, tick);
        }
    }
    if !planet.research.is_researched(research) {
        planet.research.start_research(research, tick);
        tick += research.research_time();
        planet.update(tick);
    }
    tick
}

/// Add finished ships to a planet's fleet, with ids starting at `first_id`.
pub fn station_ships(planet: &mut Planet, ships: &[ShipType], first_id: u32) {
    for (offset, &ship_type) in (0_u32..).zip(ships) {
        planet
            .fleet
            .add_ship(Ship::new(ShipId::new(first_id + offset), ship_type));
    }
}

/// A session with two registered players, "Ada" and "Bob", whose home
/// planets each carry the given ships.
#[must_use]
pub fn two_player_session(seed: u64, ships: &[ShipType]) -> (Simulation, PlayerId, PlayerId) {
    let mut sim = Simulation::new(seed);
    let ada = sim.register_player("Ada");
    let bob = sim.register_player("Bob");

    for player in [ada, bob] {
        let home = sim.player(player).map(|p| p.home_planet);
        if let Some(planet) = home.and_then(|id| sim.planet_mut(id)) {
            station_ships(planet, ships, 1000);
        }
    }
    (sim, ada, bob)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_research_walks_prerequisites() {
        let mut planet = rich_planet(1);
        let next = complete_research(&mut planet, ResearchType::ShieldTechnology, 0);

        assert!(planet.research.is_researched(ResearchType::ImprovedMining));
        assert!(planet.research.is_researched(ResearchType::AdvancedPowerSystems));
        assert!(planet.research.is_researched(ResearchType::EnhancedShipHulls));
        assert!(planet.research.is_researched(ResearchType::ShieldTechnology));
        assert_eq!(next, 4);
    }

    #[test]
    fn test_two_player_session() {
        let (sim, ada, bob) = two_player_session(1, &[ShipType::LightFighter]);
        for player in [ada, bob] {
            let home = sim.player(player).unwrap().home_planet;
            assert_eq!(sim.planet(home).unwrap().fleet.ships.len(), 1);
        }
    }

    #[test]
    fn test_flat_geo_distance() {
        let d = FlatGeo.distance_km(Location::new(0.0, 0.0), Location::new(3.0, 4.0));
        assert!((d - 5.0).abs() < 1e-12);
    }
}
