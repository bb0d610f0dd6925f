//! Trip preprocessing
//!
//! Turns validated trips into a normalized numeric feature matrix:
//! - Row validity and geo-domain filtering
//! - Ordinal encoding of geohash cells
//! - Feature assembly in a fixed column order
//! - Row-wise unit-norm scaling

pub mod assembler;
pub mod encoder;
pub mod filter;
pub mod normalizer;

pub use assembler::{FeatureAssembler, FeatureRow, FeatureTable, FEATURE_COLUMNS, LABEL_COLUMN, N_FEATURES};
pub use encoder::{OrdinalEncoder, UNKNOWN_ORDINAL};
pub use filter::{retain_geo_domain, validate, DropReason, FilterReport, GeoTagged};
pub use normalizer::{rescale, Norm, Normalizer};
