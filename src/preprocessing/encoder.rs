//! Ordinal encoding of categorical columns

use crate::error::{FarecastError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ordinal assigned to values never seen during fit
pub const UNKNOWN_ORDINAL: i64 = -1;

/// Maps each distinct value of a column to an integer, starting at 1 in
/// order of first appearance. Each column gets its own mapping.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrdinalEncoder {
    // column name -> (category -> ordinal)
    mappings: HashMap<String, HashMap<String, i64>>,
}

impl OrdinalEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit the mapping for one column, replacing any previous fit.
    pub fn fit<'a, I>(&mut self, column: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut mapping: HashMap<String, i64> = HashMap::new();
        for value in values {
            if !mapping.contains_key(value) {
                let next = mapping.len() as i64 + 1;
                mapping.insert(value.to_string(), next);
            }
        }

        self.mappings.insert(column.to_string(), mapping);
        self
    }

    /// Encode a single value of a fitted column
    pub fn encode(&self, column: &str, value: &str) -> Result<i64> {
        let mapping = self.mapping(column)?;
        Ok(mapping.get(value).copied().unwrap_or(UNKNOWN_ORDINAL))
    }

    /// Encode a sequence of values of a fitted column
    pub fn transform<'a, I>(&self, column: &str, values: I) -> Result<Vec<i64>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mapping = self.mapping(column)?;
        Ok(values
            .into_iter()
            .map(|v| mapping.get(v).copied().unwrap_or(UNKNOWN_ORDINAL))
            .collect())
    }

    /// Fit and transform in one step
    pub fn fit_transform<'a, I>(&mut self, column: &str, values: I) -> Result<Vec<i64>>
    where
        I: IntoIterator<Item = &'a str> + Clone,
    {
        self.fit(column, values.clone());
        self.transform(column, values)
    }

    /// Number of distinct values seen for `column`
    pub fn n_categories(&self, column: &str) -> usize {
        self.mappings.get(column).map_or(0, HashMap::len)
    }

    /// Fitted categories of `column` ordered by ordinal
    pub fn categories(&self, column: &str) -> Vec<(String, i64)> {
        let mut categories: Vec<(String, i64)> = self
            .mappings
            .get(column)
            .map(|m| m.iter().map(|(k, v)| (k.clone(), *v)).collect())
            .unwrap_or_default();
        categories.sort_by_key(|(_, ordinal)| *ordinal);
        categories
    }

    pub fn is_fitted(&self, column: &str) -> bool {
        self.mappings.contains_key(column)
    }

    fn mapping(&self, column: &str) -> Result<&HashMap<String, i64>> {
        self.mappings
            .get(column)
            .ok_or_else(|| FarecastError::FeatureNotFound(column.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_appearance_order() {
        let mut encoder = OrdinalEncoder::new();
        let encoded = encoder
            .fit_transform("pickup", ["dr5ru", "dr5rs", "dr5ru", "dr72h"])
            .unwrap();

        assert_eq!(encoded, vec![1, 2, 1, 3]);
        assert_eq!(encoder.n_categories("pickup"), 3);
        assert_eq!(
            encoder.categories("pickup"),
            vec![
                ("dr5ru".to_string(), 1),
                ("dr5rs".to_string(), 2),
                ("dr72h".to_string(), 3)
            ]
        );
    }

    #[test]
    fn test_columns_are_independent() {
        let mut encoder = OrdinalEncoder::new();
        encoder.fit("pickup", ["dr5ru", "dr5rs"]);
        encoder.fit("dropoff", ["dr5rs"]);

        assert_eq!(encoder.encode("pickup", "dr5rs").unwrap(), 2);
        assert_eq!(encoder.encode("dropoff", "dr5rs").unwrap(), 1);
    }

    #[test]
    fn test_unknown_value() {
        let mut encoder = OrdinalEncoder::new();
        encoder.fit("pickup", ["dr5ru"]);
        assert_eq!(encoder.encode("pickup", "dr72h").unwrap(), UNKNOWN_ORDINAL);
    }

    #[test]
    fn test_unfitted_column() {
        let encoder = OrdinalEncoder::new();
        assert!(!encoder.is_fitted("pickup"));
        assert!(matches!(
            encoder.encode("pickup", "dr5ru"),
            Err(FarecastError::FeatureNotFound(_))
        ));
    }
}
