//! Platform-agnostic types for Sensor.Community air-quality data.
//!
//! This crate provides shared types used by the airgauge core pipeline,
//! the snapshot store and the command-line front end.
//!
//! # Features
//!
//! - Wire types for raw Sensor.Community readings, tolerant of string-encoded numbers
//! - Configured [`Location`]s
//! - Derived data: [`PollutantSample`], [`AqiResult`], [`Category`], [`Trend`]
//! - Persisted data: [`History`], [`HistoryEntry`], [`PreviousState`]
//! - Error types for value parsing
//!
//! # Example
//!
//! ```
//! use airgauge_types::{Category, Rgba, Trend};
//!
//! assert_eq!(Category::Moderate.label(), "Moderate");
//! assert_eq!(Category::Good.color(), Rgba::new(0, 255, 128, 220));
//! assert_eq!(Trend::Up.icon(), "arrow_up");
//! ```

pub mod error;
pub mod types;

pub use error::ParseError;
pub use types::{
    AqiResult, Category, GeoLocation, History, HistoryEntry, Location, Measurement, NO_DATA_LABEL,
    PollutantSample, PreviousState, Rgba, Scalar, SensorReading, SensorRef, StateEntry, Trend,
};
