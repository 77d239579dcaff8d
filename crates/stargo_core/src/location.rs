//! Geographic placement of planets.
//!
//! Planets sit at real-world coordinates; 10 km on the ground is one light
//! year in the game. The core never does geodesy itself: distances and
//! random placement come from a [`LocationService`] supplied by the caller.

use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Kilometres per in-game light year.
pub const KM_PER_LIGHT_YEAR: f64 = 10.0;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Location {
    /// Create a location from degrees.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl std::hash::Hash for Location {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.latitude.to_bits().hash(state);
        self.longitude.to_bits().hash(state);
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Convert ground kilometres to light years.
#[must_use]
pub fn km_to_light_years(km: f64) -> f64 {
    km / KM_PER_LIGHT_YEAR
}

/// Convert light years to ground kilometres.
#[must_use]
pub fn light_years_to_km(light_years: f64) -> f64 {
    light_years * KM_PER_LIGHT_YEAR
}

/// Distance and random-placement queries over real-world coordinates.
pub trait LocationService {
    /// Distance between two points in kilometres.
    fn distance_km(&self, a: Location, b: Location) -> f64;

    /// A random point within `radius_km` of `center`.
    fn random_near(&self, center: Location, radius_km: f64, rng: &mut dyn RngCore) -> Location;

    /// Distance in light years.
    fn distance_light_years(&self, a: Location, b: Location) -> f64 {
        km_to_light_years(self.distance_km(a, b))
    }
}
