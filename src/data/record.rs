//! Trip rows before and after validation

use crate::geo::Coordinate;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A trip row exactly as read; any field may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTrip {
    pub key: Option<String>,
    pub fare_amount: Option<f64>,
    pub pickup_datetime: Option<String>,
    pub pickup_longitude: Option<f64>,
    pub pickup_latitude: Option<f64>,
    pub dropoff_longitude: Option<f64>,
    pub dropoff_latitude: Option<f64>,
    pub passenger_count: Option<i64>,
}

/// A trip that passed the validity pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub key: String,
    pub pickup_datetime: NaiveDateTime,
    pub pickup: Coordinate,
    pub dropoff: Coordinate,
    pub passenger_count: u32,
    pub fare_amount: f64,
}
