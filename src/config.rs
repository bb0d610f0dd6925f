//! Pipeline configuration

use crate::error::{FarecastError, Result};
use crate::geo::geohash::{BASE32, MAX_PRECISION};
use crate::preprocessing::Norm;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Configuration for the fare feature pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Raw trip CSV
    pub data_path: PathBuf,

    /// Persistent `nrows -> (X, y)` store
    pub cache_path: PathBuf,

    /// Geohash prefix every retained pickup and dropoff must share
    pub geohash_prefix: String,

    /// Geohash length in characters
    pub geohash_precision: usize,

    /// Row norm used when rescaling the feature matrix
    pub norm: Norm,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("./data/train.csv"),
            cache_path: PathBuf::from("./cache.bin"),
            geohash_prefix: "dr".to_string(),
            geohash_precision: 5,
            norm: Norm::L2,
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            FarecastError::ConfigError(format!("Failed to open {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Builder method to set the input file
    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = path.into();
        self
    }

    /// Builder method to set the cache file
    pub fn with_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = path.into();
        self
    }

    /// Builder method to set the geohash domain prefix
    pub fn with_geohash_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.geohash_prefix = prefix.into();
        self
    }

    /// Builder method to set the geohash precision
    pub fn with_geohash_precision(mut self, precision: usize) -> Self {
        self.geohash_precision = precision;
        self
    }

    /// Builder method to set the row norm
    pub fn with_norm(mut self, norm: Norm) -> Self {
        self.norm = norm;
        self
    }

    /// Check that the geohash settings can ever match an encoded cell.
    pub fn validate(&self) -> Result<()> {
        if self.geohash_precision == 0 || self.geohash_precision > MAX_PRECISION {
            return Err(FarecastError::InvalidParameter {
                name: "geohash_precision".to_string(),
                value: self.geohash_precision.to_string(),
                reason: format!("must be between 1 and {}", MAX_PRECISION),
            });
        }

        if self.geohash_prefix.len() > self.geohash_precision {
            return Err(FarecastError::InvalidParameter {
                name: "geohash_prefix".to_string(),
                value: self.geohash_prefix.clone(),
                reason: "longer than the geohash precision".to_string(),
            });
        }

        if let Some(c) = self
            .geohash_prefix
            .bytes()
            .find(|b| !BASE32.contains(b))
        {
            return Err(FarecastError::InvalidParameter {
                name: "geohash_prefix".to_string(),
                value: self.geohash_prefix.clone(),
                reason: format!("'{}' is not a geohash character", c as char),
            });
        }

        Ok(())
    }
}
