//! Raw trip input
//!
//! Loading of the fixed-schema trip CSV and conversion of its rows into
//! [`RawTrip`] values for the validity pass.

mod loader;
mod record;

pub use loader::{raw_trips, TripLoader, REQUIRED_COLUMNS};
pub use record::{RawTrip, TripRecord};
