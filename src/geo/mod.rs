//! Geospatial encoding
//!
//! - [`geohash`] - fixed-precision base-32 geohash cells
//! - [`distance`] - great-circle (haversine) distance between coordinates

pub mod distance;
pub mod geohash;

pub use distance::{haversine, Coordinate, EARTH_RADIUS_M};
pub use geohash::{encode, GeohashCode};
