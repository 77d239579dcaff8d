//! Planet generation.
//!
//! All randomness comes from the caller's RNG so that a seeded session
//! produces the same planets every run.

use rand::Rng;

use crate::buildings::BuildingType;
use crate::clock::Tick;
use crate::location::Location;
use crate::planet::{Planet, PlanetId};
use crate::resources::Resources;

/// Most planets a single scan can produce.
pub const MAX_PLANETS_PER_SCAN: usize = 5;

/// Radius of a scan around its center, in kilometres.
pub const SCAN_RADIUS_KM: f64 = 10.0;

/// Minimum spacing between planets, in light years.
pub const MIN_PLANET_SPACING_LY: f64 = 0.5;

const NAME_PREFIXES: [&str; 7] = ["Alpha", "Beta", "Gamma", "Delta", "Nova", "Proxima", "Sirius"];
const NAME_SUFFIXES: [&str; 6] = ["Prime", "Major", "Minor", "X", "Y", "Z"];

/// A player's established homeworld: discovered at `location`, level-2
/// command center, mine, power plant and a larger stockpile.
#[must_use]
pub fn create_home_planet(id: PlanetId, location: Location, tick: Tick) -> Planet {
    let mut planet = Planet::new(id, "Home Base", tick);
    planet.discover(location, tick);
    planet.resources = Resources::from_units(2000, 1000, 500);

    planet.place_building(BuildingType::CommandCenter, 2);
    planet.place_building(BuildingType::Mine, 1);
    planet.place_building(BuildingType::PowerPlant, 1);
    planet
}

/// An unowned planet with a random stockpile and low-level economy.
pub fn create_random_planet<R: Rng + ?Sized>(id: PlanetId, rng: &mut R, tick: Tick) -> Planet {
    let mut planet = Planet::new(id, generate_planet_name(rng), tick);
    planet.resources = Resources::from_units(
        rng.gen_range(500..=2000),
        rng.gen_range(300..=1500),
        rng.gen_range(100..=1000),
    );

    for building_type in [BuildingType::Mine, BuildingType::PowerPlant] {
        let level = rng.gen_range(1..=3);
        planet.place_building(building_type, level);
    }
    planet
}

/// A name like `Nova Prime-042`.
pub fn generate_planet_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let prefix = NAME_PREFIXES[rng.gen_range(0..NAME_PREFIXES.len())];
    let suffix = NAME_SUFFIXES[rng.gen_range(0..NAME_SUFFIXES.len())];
    let number: u32 = rng.gen_range(1..=999);
    format!("{prefix} {suffix}-{number:03}")
}
