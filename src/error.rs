//! Error types for farecast

use thiserror::Error;

/// Result type alias for farecast operations
pub type Result<T> = std::result::Result<T, FarecastError>;

/// Main error type for the fare feature pipeline
#[derive(Error, Debug)]
pub enum FarecastError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Coordinate out of range: latitude {latitude}, longitude {longitude}")]
    CoordinateOutOfRange { latitude: f64, longitude: f64 },

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },
}

impl From<polars::error::PolarsError> for FarecastError {
    fn from(err: polars::error::PolarsError) -> Self {
        FarecastError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for FarecastError {
    fn from(err: serde_json::Error) -> Self {
        FarecastError::SerializationError(err.to_string())
    }
}

impl From<bincode::Error> for FarecastError {
    fn from(err: bincode::Error) -> Self {
        FarecastError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for FarecastError {
    fn from(err: ndarray::ShapeError) -> Self {
        FarecastError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}
