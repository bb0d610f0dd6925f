//! Great-circle distance

use serde::{Deserialize, Serialize};

/// Mean Earth radius in metres
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A point on Earth in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self { latitude, longitude }
    }
}

/// Haversine distance in metres between two coordinates, rounded to 3 decimals.
pub fn haversine(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();

    let delta_phi = (b.latitude - a.latitude).to_radians();
    let delta_lambda = (b.longitude - a.longitude).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    round_to(EARTH_RADIUS_M * c, 3)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEW_YORK: (f64, f64) = (40.7128, -74.0060);
    const LOS_ANGELES: (f64, f64) = (34.0522, -118.2437);

    #[test]
    fn test_new_york_to_los_angeles() {
        let d = haversine(NEW_YORK.into(), LOS_ANGELES.into());
        let expected = 3_936_000.0;
        assert!((d - expected).abs() / expected < 0.01, "got {}", d);
    }

    #[test]
    fn test_symmetry() {
        let pairs = [
            (NEW_YORK, LOS_ANGELES),
            ((40.721319, -73.844311), (40.712278, -73.841610)),
            ((-33.8688, 151.2093), (51.5074, -0.1278)),
            ((0.0, 179.9), (0.0, -179.9)),
        ];
        for (a, b) in pairs {
            assert_eq!(haversine(a.into(), b.into()), haversine(b.into(), a.into()));
        }
    }

    #[test]
    fn test_zero_distance() {
        let p = Coordinate::new(40.761432, -73.979815);
        assert_eq!(haversine(p, p), 0.0);
    }

    #[test]
    fn test_rounded_to_millimetres() {
        let d = haversine((40.721319, -73.844311).into(), (40.712278, -73.841610).into());
        assert_eq!(d, (d * 1000.0).round() / 1000.0);
        // ~1.03 km trip in Queens
        assert!(d > 1_000.0 && d < 1_060.0, "got {}", d);
    }

    #[test]
    fn test_antimeridian_is_short() {
        let d = haversine((0.0, 179.9).into(), (0.0, -179.9).into());
        assert!(d < 25_000.0, "got {}", d);
    }
}
