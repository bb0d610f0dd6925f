//! farecast - feature preparation for taxi fare regression
//!
//! Turns raw trip records into a numeric feature matrix and caches the result
//! per dataset size.
//!
//! # Modules
//!
//! ## Features
//! - [`geo`] - Geohash encoding and haversine distance
//! - [`temporal`] - Calendar fields from pickup timestamps
//! - [`preprocessing`] - Filtering, ordinal encoding, assembly, normalization
//!
//! ## Data
//! - [`data`] - Trip CSV loading
//! - [`dataset`] - The `(X, y)` pair handed to model training
//! - [`cache`] - Persistent `nrows -> (X, y)` store
//!
//! ## Driver
//! - [`pipeline`] - End-to-end preparation with caching
//! - [`config`] - Pipeline configuration
//! - [`cli`] - Command-line interface
//! - [`utils`] - Stage timing

// Core error handling
pub mod error;

pub mod config;

// Features
pub mod geo;
pub mod preprocessing;
pub mod temporal;

// Data
pub mod cache;
pub mod data;
pub mod dataset;

// Driver
pub mod cli;
pub mod pipeline;
pub mod utils;

pub use error::{FarecastError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{FarecastError, Result};

    pub use crate::cache::FeatureCache;
    pub use crate::config::PipelineConfig;
    pub use crate::data::{RawTrip, TripLoader, TripRecord};
    pub use crate::dataset::Dataset;
    pub use crate::geo::{encode, haversine, Coordinate, GeohashCode};
    pub use crate::pipeline::FarePipeline;
    pub use crate::preprocessing::{
        rescale, FeatureAssembler, FeatureRow, FilterReport, Norm, Normalizer, OrdinalEncoder,
        FEATURE_COLUMNS,
    };
    pub use crate::temporal::{parse_timestamp, TemporalFeatures};
}
