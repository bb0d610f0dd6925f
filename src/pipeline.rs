//! End-to-end fare feature pipeline
//!
//! load (first `nrows` rows) → validity pass → assemble (calendar, geohash,
//! geo-domain pass, ordinal encoding, distance) → split → rescale → cache.

use crate::cache::FeatureCache;
use crate::config::PipelineConfig;
use crate::data::{raw_trips, TripLoader};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::preprocessing::{validate, FeatureAssembler, FilterReport, Normalizer};
use crate::utils::{timed, Timer};
use polars::prelude::DataFrame;
use tracing::info;

/// Pipeline bound to one configuration and its cache
#[derive(Debug)]
pub struct FarePipeline {
    config: PipelineConfig,
    loader: TripLoader,
    cache: FeatureCache,
}

impl FarePipeline {
    /// Validate `config` and open its cache.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let cache = FeatureCache::open(&config.cache_path)?;
        Ok(Self {
            config,
            loader: TripLoader::new(),
            cache,
        })
    }

    pub fn with_loader(mut self, loader: TripLoader) -> Self {
        self.loader = loader;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn cache(&self) -> &FeatureCache {
        &self.cache
    }

    /// Cached `(X, y)` for `nrows`, computed from the data file on first request.
    pub fn load_data(&self, nrows: usize) -> Result<Dataset> {
        timed("load_data", || {
            self.cache.load_or_compute(nrows, || self.compute(nrows))
        })
    }

    /// Read the first `nrows` rows of the data file and prepare them, bypassing the cache.
    pub fn compute(&self, nrows: usize) -> Result<Dataset> {
        let mut timer = Timer::start(format!("prepare nrows={}", nrows));

        let df = timed("load_frame", || self.loader.load(&self.config.data_path, nrows))?;
        timer.checkpoint("load_frame");

        let (dataset, report) = self.prepare_frame(&df)?;
        timer.checkpoint("prepare_frame");
        timer.stop();

        info!(nrows, %report, "Prepared dataset");
        Ok(dataset)
    }

    /// Run every transformation stage on an already loaded trip frame.
    pub fn prepare_frame(&self, df: &DataFrame) -> Result<(Dataset, FilterReport)> {
        let raw = timed("read_rows", || raw_trips(df))?;
        let (records, mut report) = timed("clean", || validate(raw));

        let assembler = FeatureAssembler::from_config(&self.config);
        let table = timed("transform", || assembler.assemble(&records, &mut report))?;

        let (features, labels) = timed("split", || table.split())?;
        let features = timed("rescale", || Normalizer::new(self.config.norm).transform(&features));

        Ok((Dataset::new(features, labels)?, report))
    }
}
