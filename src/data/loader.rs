//! Trip CSV loading

use super::RawTrip;
use crate::error::{FarecastError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Columns the trip file must provide
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "key",
    "fare_amount",
    "pickup_datetime",
    "pickup_longitude",
    "pickup_latitude",
    "dropoff_longitude",
    "dropoff_latitude",
    "passenger_count",
];

/// Column types fixed before reading; every other column is inferred
const COLUMN_TYPES: [(&str, DataType); 8] = [
    ("key", DataType::String),
    ("fare_amount", DataType::Float64),
    ("pickup_datetime", DataType::String),
    ("pickup_longitude", DataType::Float64),
    ("pickup_latitude", DataType::Float64),
    ("dropoff_longitude", DataType::Float64),
    ("dropoff_latitude", DataType::Float64),
    ("passenger_count", DataType::Int64),
];

const INFER_SCHEMA_ROWS: usize = 1000;

/// Loader for the raw trip file
#[derive(Debug, Clone)]
pub struct TripLoader {
    delimiter: u8,
}

impl Default for TripLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TripLoader {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    /// Set the field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Read the first `nrows` data rows of the file at `path`.
    ///
    /// The trip columns are read with fixed types, so a fare of `7.5` after a
    /// long run of whole-number fares still parses. Cells that fail to parse
    /// become nulls; the validity pass drops them.
    pub fn load(&self, path: impl AsRef<Path>, nrows: usize) -> Result<DataFrame> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            FarecastError::DataError(format!("Failed to open {}: {}", path.display(), e))
        })?;

        let parse_opts = CsvParseOptions::default().with_separator(self.delimiter);

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_n_rows(Some(nrows))
            .with_schema_overwrite(Some(Arc::new(trip_schema())))
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .with_ignore_errors(true)
            .with_parse_options(parse_opts)
            .into_reader_with_file_handle(file)
            .finish()?;

        check_columns(&df)?;
        debug!(rows = df.height(), cols = df.width(), path = %path.display(), "Loaded trip file");

        Ok(df)
    }
}

fn trip_schema() -> Schema {
    let mut schema = Schema::with_capacity(COLUMN_TYPES.len());
    for (name, dtype) in COLUMN_TYPES {
        schema.with_column(name.into(), dtype);
    }
    schema
}

fn check_columns(df: &DataFrame) -> Result<()> {
    for name in REQUIRED_COLUMNS {
        if df.column(name).is_err() {
            return Err(FarecastError::FeatureNotFound(name.to_string()));
        }
    }
    Ok(())
}

/// Convert a trip frame into rows. Extra columns are ignored.
pub fn raw_trips(df: &DataFrame) -> Result<Vec<RawTrip>> {
    check_columns(df)?;

    let keys = str_column(df, "key")?;
    let fares = f64_column(df, "fare_amount")?;
    let pickup_times = str_column(df, "pickup_datetime")?;
    let pickup_lons = f64_column(df, "pickup_longitude")?;
    let pickup_lats = f64_column(df, "pickup_latitude")?;
    let dropoff_lons = f64_column(df, "dropoff_longitude")?;
    let dropoff_lats = f64_column(df, "dropoff_latitude")?;
    let passengers = i64_column(df, "passenger_count")?;

    let trips = (0..df.height())
        .map(|i| RawTrip {
            key: keys[i].clone(),
            fare_amount: fares[i],
            pickup_datetime: pickup_times[i].clone(),
            pickup_longitude: pickup_lons[i],
            pickup_latitude: pickup_lats[i],
            dropoff_longitude: dropoff_lons[i],
            dropoff_latitude: dropoff_lats[i],
            passenger_count: passengers[i],
        })
        .collect();

    Ok(trips)
}

fn materialized(df: &DataFrame, name: &str) -> Result<Series> {
    let column = df
        .column(name)
        .map_err(|_| FarecastError::FeatureNotFound(name.to_string()))?;
    Ok(column.as_materialized_series().clone())
}

fn f64_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let series = materialized(df, name)?.cast(&DataType::Float64)?;
    let values = series.f64()?.into_iter().collect();
    Ok(values)
}

fn i64_column(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>> {
    let series = materialized(df, name)?.cast(&DataType::Int64)?;
    let values = series.i64()?.into_iter().collect();
    Ok(values)
}

fn str_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = materialized(df, name)?.cast(&DataType::String)?;
    let values = series
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_trip_csv() -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(
            file,
            "key,fare_amount,pickup_datetime,pickup_longitude,pickup_latitude,dropoff_longitude,dropoff_latitude,passenger_count"
        )
        .unwrap();
        writeln!(file, "2009-06-15 17:26:21.0000001,4.5,2009-06-15 17:26:21 UTC,-73.844311,40.721319,-73.84161,40.712278,1").unwrap();
        writeln!(file, "2010-01-05 16:52:16.0000002,16.9,2010-01-05 16:52:16 UTC,-74.016048,40.711303,-73.979268,40.782004,1").unwrap();
        writeln!(file, "2011-08-18 00:35:00.00000049,5.7,2011-08-18 00:35:00 UTC,-73.982738,40.76127,-73.991242,40.750562,2").unwrap();
        writeln!(file, "2012-04-21 04:30:42.0000001,7.7,2012-04-21 04:30:42 UTC,-73.98713,40.733143,,40.758092,1").unwrap();
        file
    }

    #[test]
    fn test_load_limits_rows() {
        let file = create_trip_csv();
        let df = TripLoader::new().load(file.path(), 2).unwrap();
        assert_eq!(df.height(), 2);

        let df = TripLoader::new().load(file.path(), 100).unwrap();
        assert_eq!(df.height(), 4);
    }

    #[test]
    fn test_raw_trips_keeps_nulls() {
        let file = create_trip_csv();
        let df = TripLoader::new().load(file.path(), 10).unwrap();
        let trips = raw_trips(&df).unwrap();

        assert_eq!(trips.len(), 4);
        assert_eq!(trips[0].fare_amount, Some(4.5));
        assert_eq!(trips[2].passenger_count, Some(2));
        assert_eq!(
            trips[1].pickup_datetime.as_deref(),
            Some("2010-01-05 16:52:16 UTC")
        );
        assert_eq!(trips[3].dropoff_longitude, None);
    }

    #[test]
    fn test_missing_column() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "key,fare_amount").unwrap();
        writeln!(file, "a,1.0").unwrap();

        let err = TripLoader::new().load(file.path(), 10).unwrap_err();
        assert!(matches!(err, FarecastError::FeatureNotFound(_)));
    }

    #[test]
    fn test_fractional_fare_after_whole_numbers() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "{}", REQUIRED_COLUMNS.join(",")).unwrap();
        for i in 0..1200 {
            let fare = if i == 1099 { "7.5" } else { "5" };
            writeln!(
                file,
                "k{i},{fare},2011-08-18 00:35:00 UTC,-73,40,-74,41,1"
            )
            .unwrap();
        }

        let df = TripLoader::new().load(file.path(), 1200).unwrap();
        assert_eq!(df.column("fare_amount").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("pickup_latitude").unwrap().dtype(), &DataType::Float64);

        let trips = raw_trips(&df).unwrap();
        assert_eq!(trips.len(), 1200);
        assert!(trips.iter().all(|t| t.fare_amount.is_some()));
        assert_eq!(trips[1099].fare_amount, Some(7.5));
        assert_eq!(trips[0].pickup_longitude, Some(-73.0));
    }

    #[test]
    fn test_custom_delimiter() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "{}", REQUIRED_COLUMNS.join(";")).unwrap();
        writeln!(file, "k1;4.5;2009-06-15 17:26:21 UTC;-73.844311;40.721319;-73.84161;40.712278;1").unwrap();

        let df = TripLoader::new()
            .with_delimiter(b';')
            .load(file.path(), 10)
            .unwrap();
        let trips = raw_trips(&df).unwrap();

        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].fare_amount, Some(4.5));
        assert_eq!(trips[0].dropoff_latitude, Some(40.712278));
    }

    #[test]
    fn test_missing_file() {
        let err = TripLoader::new().load("/nonexistent/train.csv", 10).unwrap_err();
        assert!(matches!(err, FarecastError::DataError(_)));
    }
}
