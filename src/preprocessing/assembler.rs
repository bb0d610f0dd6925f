//! Feature assembly
//!
//! Derives calendar, geohash and distance columns from validated trips,
//! applies the geo-domain pass, ordinal-encodes the geohash columns and
//! projects everything onto the fixed column order:
//!
//! `[year, month, day, hour, pickup_geohash, dropoff_geohash, distance, passenger_count, fare_amount]`
//!
//! The last column is the label.

use super::encoder::OrdinalEncoder;
use super::filter::{retain_geo_domain, DropReason, FilterReport, GeoTagged};
use crate::config::PipelineConfig;
use crate::data::TripRecord;
use crate::error::{FarecastError, Result};
use crate::geo::{encode, haversine, Coordinate, GeohashCode};
use crate::temporal::TemporalFeatures;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Feature matrix columns, in matrix order
pub const FEATURE_COLUMNS: [&str; 8] = [
    "year",
    "month",
    "day",
    "hour",
    "pickup_geohash",
    "dropoff_geohash",
    "distance",
    "passenger_count",
];

/// Label column, always last in a [`FeatureRow`]
pub const LABEL_COLUMN: &str = "fare_amount";

pub const N_FEATURES: usize = FEATURE_COLUMNS.len();

/// One assembled sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub pickup_geohash: i64,
    pub dropoff_geohash: i64,
    pub distance: f64,
    pub passenger_count: u32,
    pub fare_amount: f64,
}

impl FeatureRow {
    /// Feature values in [`FEATURE_COLUMNS`] order
    pub fn features(&self) -> [f64; N_FEATURES] {
        [
            f64::from(self.year),
            f64::from(self.month),
            f64::from(self.day),
            f64::from(self.hour),
            self.pickup_geohash as f64,
            self.dropoff_geohash as f64,
            self.distance,
            f64::from(self.passenger_count),
        ]
    }

    pub fn label(&self) -> f64 {
        self.fare_amount
    }
}

/// Assembled rows plus the encoder fitted on them
#[derive(Debug, Clone)]
pub struct FeatureTable {
    rows: Vec<FeatureRow>,
    encoder: OrdinalEncoder,
}

impl FeatureTable {
    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Encoder fitted on this table's geohash columns
    pub fn encoder(&self) -> &OrdinalEncoder {
        &self.encoder
    }

    /// Split into the feature matrix (all columns but the last) and label vector.
    pub fn split(&self) -> Result<(Array2<f64>, Array1<f64>)> {
        let flat: Vec<f64> = self.rows.iter().flat_map(|r| r.features()).collect();
        let features = Array2::from_shape_vec((self.rows.len(), N_FEATURES), flat)?;
        let labels: Array1<f64> = self.rows.iter().map(FeatureRow::label).collect();
        Ok((features, labels))
    }
}

/// Builds a [`FeatureTable`] from validated trips
#[derive(Debug, Clone)]
pub struct FeatureAssembler {
    prefix: String,
    precision: usize,
}

impl FeatureAssembler {
    pub fn new(prefix: impl Into<String>, precision: usize) -> Self {
        Self {
            prefix: prefix.into(),
            precision,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.geohash_prefix.clone(), config.geohash_precision)
    }

    /// Assemble features for `records`, recording geo-domain drops in `report`.
    pub fn assemble(&self, records: &[TripRecord], report: &mut FilterReport) -> Result<FeatureTable> {
        let mut tagged = Vec::with_capacity(records.len());
        for record in records {
            match self.cells(record)? {
                Some((pickup, dropoff)) => tagged.push(GeoTagged {
                    row: record,
                    pickup,
                    dropoff,
                }),
                None => report.record(DropReason::OutOfRangeCoordinates),
            }
        }

        let tagged = retain_geo_domain(tagged, &self.prefix, report);

        let mut encoder = OrdinalEncoder::new();
        let pickup_codes = encoder.fit_transform("pickup_geohash", tagged.iter().map(|t| t.pickup.as_str()))?;
        let dropoff_codes = encoder.fit_transform("dropoff_geohash", tagged.iter().map(|t| t.dropoff.as_str()))?;

        let rows: Vec<FeatureRow> = tagged
            .iter()
            .zip(pickup_codes.into_iter().zip(dropoff_codes))
            .map(|(t, (pickup_geohash, dropoff_geohash))| {
                let record = t.row;
                let calendar = TemporalFeatures::extract(&record.pickup_datetime);
                FeatureRow {
                    year: calendar.year,
                    month: calendar.month,
                    day: calendar.day,
                    hour: calendar.hour,
                    pickup_geohash,
                    dropoff_geohash,
                    distance: haversine(record.pickup, record.dropoff),
                    passenger_count: record.passenger_count,
                    fare_amount: record.fare_amount,
                }
            })
            .collect();

        debug!(
            rows = rows.len(),
            pickup_cells = encoder.n_categories("pickup_geohash"),
            dropoff_cells = encoder.n_categories("dropoff_geohash"),
            "Assembled feature table"
        );

        Ok(FeatureTable { rows, encoder })
    }

    /// Pickup and dropoff cells, or `None` when a coordinate is off the globe.
    fn cells(&self, record: &TripRecord) -> Result<Option<(GeohashCode, GeohashCode)>> {
        let pickup = match self.cell(record.pickup)? {
            Some(code) => code,
            None => return Ok(None),
        };
        let dropoff = match self.cell(record.dropoff)? {
            Some(code) => code,
            None => return Ok(None),
        };
        Ok(Some((pickup, dropoff)))
    }

    fn cell(&self, point: Coordinate) -> Result<Option<GeohashCode>> {
        match encode(point.latitude, point.longitude, self.precision) {
            Ok(code) => Ok(Some(code)),
            Err(FarecastError::CoordinateOutOfRange { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
