//! Row-wise normalization

use crate::error::{FarecastError, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Norm each sample row is scaled to unity under
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Norm {
    /// Sum of absolute values
    L1,
    /// Euclidean length
    #[default]
    L2,
    /// Largest absolute value
    Max,
}

impl FromStr for Norm {
    type Err = FarecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "l1" => Ok(Norm::L1),
            "l2" => Ok(Norm::L2),
            "max" => Ok(Norm::Max),
            other => Err(FarecastError::InvalidParameter {
                name: "norm".to_string(),
                value: other.to_string(),
                reason: "expected one of l1, l2, max".to_string(),
            }),
        }
    }
}

/// Stateless row normalizer
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    norm: Norm,
}

impl Normalizer {
    pub fn new(norm: Norm) -> Self {
        Self { norm }
    }

    pub fn norm(&self) -> Norm {
        self.norm
    }

    /// Return a copy of `x` with every non-zero row scaled to unit norm.
    pub fn transform(&self, x: &Array2<f64>) -> Array2<f64> {
        let mut out = x.clone();
        self.transform_inplace(&mut out);
        out
    }

    /// Scale rows of `x` in place. All-zero rows stay zero.
    pub fn transform_inplace(&self, x: &mut Array2<f64>) {
        for mut row in x.rows_mut() {
            let norm = match self.norm {
                Norm::L1 => row.iter().map(|v| v.abs()).sum::<f64>(),
                Norm::L2 => row.iter().map(|v| v * v).sum::<f64>().sqrt(),
                Norm::Max => row.iter().fold(0.0_f64, |acc, v| acc.max(v.abs())),
            };
            if norm != 0.0 {
                row.mapv_inplace(|v| v / norm);
            }
        }
    }
}

/// L2 row normalization
pub fn rescale(x: &Array2<f64>) -> Array2<f64> {
    Normalizer::new(Norm::L2).transform(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_l2_unit_rows() {
        let x = array![[2012.0, 4.0, 21.0, 4.0, 1.0, 2.0, 1030.8, 1.0], [3.0, 4.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]];
        let scaled = rescale(&x);

        for row in scaled.rows() {
            let norm: f64 = row.iter().map(|v| v * v).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-12);
        }
        assert!((scaled[[1, 0]] - 0.6).abs() < 1e-12);
        assert!((scaled[[1, 1]] - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_zero_row_unchanged() {
        let x = array![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]];
        let scaled = rescale(&x);
        assert_eq!(scaled.row(0).to_vec(), vec![0.0, 0.0, 0.0]);
        assert_eq!(scaled.row(1).to_vec(), vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_l1_and_max() {
        let x = array![[1.0, -3.0, 4.0]];

        let l1 = Normalizer::new(Norm::L1).transform(&x);
        assert!((l1.row(0).iter().map(|v| v.abs()).sum::<f64>() - 1.0).abs() < 1e-12);

        let max = Normalizer::new(Norm::Max).transform(&x);
        assert_eq!(max.row(0).to_vec(), vec![0.25, -0.75, 1.0]);
    }

    #[test]
    fn test_input_untouched() {
        let x = array![[3.0, 4.0]];
        let _ = rescale(&x);
        assert_eq!(x, array![[3.0, 4.0]]);
    }

    #[test]
    fn test_parse_norm() {
        assert_eq!("L2".parse::<Norm>().unwrap(), Norm::L2);
        assert_eq!("max".parse::<Norm>().unwrap(), Norm::Max);
        assert!("l3".parse::<Norm>().is_err());
    }
}
