//! Row filtering and validation
//!
//! Two passes drop rows without touching the survivors:
//! 1. [`validate`] turns [`RawTrip`]s into [`TripRecord`]s, dropping rows with
//!    missing fields, negative fares, negative passenger counts or
//!    unparseable timestamps.
//! 2. [`retain_geo_domain`] keeps rows whose pickup and dropoff geohashes both
//!    start with the configured prefix.
//!
//! Drops are counted per reason in a [`FilterReport`].

use crate::data::{RawTrip, TripRecord};
use crate::geo::{Coordinate, GeohashCode};
use crate::temporal::parse_timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a row was discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropReason {
    MissingField,
    NegativeFare,
    InvalidPassengerCount,
    InvalidTimestamp,
    OutOfRangeCoordinates,
    OutsideGeoDomain,
}

/// Row accounting across both filter passes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterReport {
    pub input_rows: usize,
    pub missing_fields: usize,
    pub negative_fare: usize,
    pub invalid_passenger_count: usize,
    pub invalid_timestamp: usize,
    pub out_of_range_coordinates: usize,
    pub outside_geo_domain: usize,
}

impl FilterReport {
    pub fn new(input_rows: usize) -> Self {
        Self {
            input_rows,
            ..Self::default()
        }
    }

    pub fn record(&mut self, reason: DropReason) {
        let counter = match reason {
            DropReason::MissingField => &mut self.missing_fields,
            DropReason::NegativeFare => &mut self.negative_fare,
            DropReason::InvalidPassengerCount => &mut self.invalid_passenger_count,
            DropReason::InvalidTimestamp => &mut self.invalid_timestamp,
            DropReason::OutOfRangeCoordinates => &mut self.out_of_range_coordinates,
            DropReason::OutsideGeoDomain => &mut self.outside_geo_domain,
        };
        *counter += 1;
    }

    /// Rows removed by either pass
    pub fn dropped(&self) -> usize {
        self.missing_fields
            + self.negative_fare
            + self.invalid_passenger_count
            + self.invalid_timestamp
            + self.out_of_range_coordinates
            + self.outside_geo_domain
    }

    pub fn retained(&self) -> usize {
        self.input_rows.saturating_sub(self.dropped())
    }
}

impl fmt::Display for FilterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} rows retained (missing={}, negative_fare={}, passengers={}, timestamp={}, out_of_range={}, outside_domain={})",
            self.retained(),
            self.input_rows,
            self.missing_fields,
            self.negative_fare,
            self.invalid_passenger_count,
            self.invalid_timestamp,
            self.out_of_range_coordinates,
            self.outside_geo_domain,
        )
    }
}

/// A row paired with its pickup and dropoff cells
#[derive(Debug, Clone)]
pub struct GeoTagged<T> {
    pub row: T,
    pub pickup: GeohashCode,
    pub dropoff: GeohashCode,
}

/// Validity pass
pub fn validate(rows: Vec<RawTrip>) -> (Vec<TripRecord>, FilterReport) {
    let mut report = FilterReport::new(rows.len());
    let mut kept = Vec::with_capacity(rows.len());

    for raw in rows {
        match check(raw) {
            Ok(record) => kept.push(record),
            Err(reason) => report.record(reason),
        }
    }

    (kept, report)
}

fn check(raw: RawTrip) -> Result<TripRecord, DropReason> {
    let (
        Some(key),
        Some(fare_amount),
        Some(pickup_datetime),
        Some(pickup_longitude),
        Some(pickup_latitude),
        Some(dropoff_longitude),
        Some(dropoff_latitude),
        Some(passenger_count),
    ) = (
        raw.key,
        raw.fare_amount,
        raw.pickup_datetime,
        raw.pickup_longitude,
        raw.pickup_latitude,
        raw.dropoff_longitude,
        raw.dropoff_latitude,
        raw.passenger_count,
    )
    else {
        return Err(DropReason::MissingField);
    };

    let floats = [
        fare_amount,
        pickup_longitude,
        pickup_latitude,
        dropoff_longitude,
        dropoff_latitude,
    ];
    if floats.iter().any(|v| v.is_nan()) {
        return Err(DropReason::MissingField);
    }

    if fare_amount < 0.0 {
        return Err(DropReason::NegativeFare);
    }

    let passenger_count =
        u32::try_from(passenger_count).map_err(|_| DropReason::InvalidPassengerCount)?;

    let pickup_datetime =
        parse_timestamp(&pickup_datetime).map_err(|_| DropReason::InvalidTimestamp)?;

    Ok(TripRecord {
        key,
        pickup_datetime,
        pickup: Coordinate::new(pickup_latitude, pickup_longitude),
        dropoff: Coordinate::new(dropoff_latitude, dropoff_longitude),
        passenger_count,
        fare_amount,
    })
}

/// Geo-domain pass
pub fn retain_geo_domain<T>(
    rows: Vec<GeoTagged<T>>,
    prefix: &str,
    report: &mut FilterReport,
) -> Vec<GeoTagged<T>> {
    let before = rows.len();
    let kept: Vec<GeoTagged<T>> = rows
        .into_iter()
        .filter(|r| r.pickup.starts_with(prefix) && r.dropoff.starts_with(prefix))
        .collect();

    report.outside_geo_domain += before - kept.len();
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::encode;

    fn raw(fare: f64) -> RawTrip {
        RawTrip {
            key: Some("2009-06-15 17:26:21.0000001".to_string()),
            fare_amount: Some(fare),
            pickup_datetime: Some("2009-06-15 17:26:21 UTC".to_string()),
            pickup_longitude: Some(-73.844311),
            pickup_latitude: Some(40.721319),
            dropoff_longitude: Some(-73.84161),
            dropoff_latitude: Some(40.712278),
            passenger_count: Some(1),
        }
    }

    #[test]
    fn test_validate_keeps_good_rows() {
        let (kept, report) = validate(vec![raw(4.5), raw(0.0)]);
        assert_eq!(kept.len(), 2);
        assert_eq!(report.dropped(), 0);
        assert_eq!(kept[0].pickup.latitude, 40.721319);
        assert_eq!(kept[0].passenger_count, 1);
    }

    #[test]
    fn test_validate_drop_reasons() {
        let mut missing = raw(5.0);
        missing.dropoff_latitude = None;

        let mut nan = raw(5.0);
        nan.pickup_longitude = Some(f64::NAN);

        let mut bad_time = raw(5.0);
        bad_time.pickup_datetime = Some("yesterday".to_string());

        let mut bad_passengers = raw(5.0);
        bad_passengers.passenger_count = Some(-2);

        let rows = vec![raw(5.0), raw(-2.5), missing, nan, bad_time, bad_passengers];
        let (kept, report) = validate(rows);

        assert_eq!(kept.len(), 1);
        assert_eq!(report.input_rows, 6);
        assert_eq!(report.negative_fare, 1);
        assert_eq!(report.missing_fields, 2);
        assert_eq!(report.invalid_timestamp, 1);
        assert_eq!(report.invalid_passenger_count, 1);
        assert_eq!(report.retained(), kept.len());
    }

    #[test]
    fn test_retain_geo_domain() {
        let tag = |id: u32, pickup: (f64, f64), dropoff: (f64, f64)| GeoTagged {
            row: id,
            pickup: encode(pickup.0, pickup.1, 5).unwrap(),
            dropoff: encode(dropoff.0, dropoff.1, 5).unwrap(),
        };

        let manhattan = (40.7580, -73.9855);
        let brooklyn = (40.6782, -73.9442);
        let null_island = (0.0, 0.0);
        let london = (51.5074, -0.1278);

        let rows = vec![
            tag(1, manhattan, brooklyn),
            tag(2, manhattan, null_island),
            tag(3, london, manhattan),
            tag(4, brooklyn, manhattan),
        ];

        let mut report = FilterReport::new(4);
        let kept = retain_geo_domain(rows, "dr", &mut report);

        let ids: Vec<u32> = kept.iter().map(|r| r.row).collect();
        assert_eq!(ids, vec![1, 4]);
        assert!(kept
            .iter()
            .all(|r| r.pickup.starts_with("dr") && r.dropoff.starts_with("dr")));
        assert_eq!(report.outside_geo_domain, 2);
        assert_eq!(report.retained(), 2);
    }

    #[test]
    fn test_report_display() {
        let mut report = FilterReport::new(3);
        report.record(DropReason::OutsideGeoDomain);
        assert!(report.to_string().starts_with("2 of 3 rows retained"));
    }
}
