//! Prepared `(X, y)` pair handed to model training

use crate::error::{FarecastError, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Feature matrix (rows = samples) and fare labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub features: Array2<f64>,
    pub labels: Array1<f64>,
}

impl Dataset {
    /// Pair a feature matrix with its labels; row counts must agree.
    pub fn new(features: Array2<f64>, labels: Array1<f64>) -> Result<Self> {
        if features.nrows() != labels.len() {
            return Err(FarecastError::ShapeError {
                expected: format!("{} labels", features.nrows()),
                actual: format!("{} labels", labels.len()),
            });
        }
        Ok(Self { features, labels })
    }

    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.n_samples() == 0
    }

    pub fn into_parts(self) -> (Array2<f64>, Array1<f64>) {
        (self.features, self.labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_shape_mismatch() {
        let err = Dataset::new(array![[1.0, 2.0], [3.0, 4.0]], array![1.0]).unwrap_err();
        assert!(matches!(err, FarecastError::ShapeError { .. }));
    }

    #[test]
    fn test_accessors() {
        let dataset = Dataset::new(array![[1.0, 2.0, 3.0]], array![9.5]).unwrap();
        assert_eq!(dataset.n_samples(), 1);
        assert_eq!(dataset.n_features(), 3);
        assert!(!dataset.is_empty());
    }
}
