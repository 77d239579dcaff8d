//! Great-circle geometry on a spherical Earth.

use rand::{Rng, RngCore};
use stargo_core::location::{Location, LocationService};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Spherical Earth model using the haversine formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalEarth {
    /// Sphere radius in kilometres.
    pub radius_km: f64,
}

impl Default for SphericalEarth {
    fn default() -> Self {
        Self {
            radius_km: EARTH_RADIUS_KM,
        }
    }
}

impl LocationService for SphericalEarth {
    fn distance_km(&self, a: Location, b: Location) -> f64 {
        let (lat1, lat2) = (a.latitude.to_radians(), b.latitude.to_radians());
        let dlat = lat2 - lat1;
        let dlon = (b.longitude - a.longitude).to_radians();

        let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * self.radius_km * h.sqrt().min(1.0).asin()
    }

    /// Uniformly distributed over the disc of `radius_km` around `center`.
    fn random_near(&self, center: Location, radius_km: f64, rng: &mut dyn RngCore) -> Location {
        let bearing = rng.gen_range(0.0..std::f64::consts::TAU);
        let distance = radius_km.max(0.0) * rng.gen::<f64>().sqrt();
        let angular = distance / self.radius_km;

        let lat1 = center.latitude.to_radians();
        let lon1 = center.longitude.to_radians();
        let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing.cos()).asin();
        let lon2 = lon1
            + (bearing.sin() * angular.sin() * lat1.cos())
                .atan2(angular.cos() - lat1.sin() * lat2.sin());

        Location::new(lat2.to_degrees(), normalize_longitude(lon2.to_degrees()))
    }
}

fn normalize_longitude(degrees: f64) -> f64 {
    (degrees + 540.0).rem_euclid(360.0) - 180.0
}
