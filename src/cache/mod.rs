//! Persistent dataset cache
//!
//! Maps the `nrows` parameter of a pipeline run to the `(X, y)` pair it
//! produced, so each dataset size is computed once.

mod store;

pub use store::{CacheSummary, FeatureCache};
