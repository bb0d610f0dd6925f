//! Utility functions and types

pub mod timer;

pub use timer::{timed, ScopedTimer, Timer};
