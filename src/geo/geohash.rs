//! Geohash encoding
//!
//! Interleaves longitude and latitude bisection bits (longitude first) and
//! emits one base-32 character per five bits. Two coordinates inside the same
//! cell share the full code; nearby cells usually share a prefix.

use crate::error::{FarecastError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Geohash alphabet (no `a`, `i`, `l`, `o`)
pub const BASE32: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// Longest code supported; 12 characters already resolve to a few centimetres
pub const MAX_PRECISION: usize = 12;

/// A geohash cell identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GeohashCode(String);

impl GeohashCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the cell lies inside the region named by `prefix`
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl fmt::Display for GeohashCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for GeohashCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Encode a coordinate into a geohash of `precision` characters.
///
/// Fails on non-finite or out-of-range coordinates instead of producing a
/// code for a cell that does not exist.
pub fn encode(latitude: f64, longitude: f64, precision: usize) -> Result<GeohashCode> {
    if precision == 0 || precision > MAX_PRECISION {
        return Err(FarecastError::InvalidParameter {
            name: "precision".to_string(),
            value: precision.to_string(),
            reason: format!("must be between 1 and {}", MAX_PRECISION),
        });
    }

    if !latitude.is_finite()
        || !longitude.is_finite()
        || !(-90.0..=90.0).contains(&latitude)
        || !(-180.0..=180.0).contains(&longitude)
    {
        return Err(FarecastError::CoordinateOutOfRange { latitude, longitude });
    }

    let mut lat_range = (-90.0_f64, 90.0_f64);
    let mut lon_range = (-180.0_f64, 180.0_f64);

    let mut code = String::with_capacity(precision);
    let mut index = 0usize;
    let mut bit = 0u8;
    let mut even = true;

    while code.len() < precision {
        let (value, range) = if even {
            (longitude, &mut lon_range)
        } else {
            (latitude, &mut lat_range)
        };

        let mid = (range.0 + range.1) / 2.0;
        if value > mid {
            index = (index << 1) | 1;
            range.0 = mid;
        } else {
            index <<= 1;
            range.1 = mid;
        }

        even = !even;
        bit += 1;
        if bit == 5 {
            code.push(BASE32[index] as char);
            index = 0;
            bit = 0;
        }
    }

    Ok(GeohashCode(code))
}
