//! Sensor selection and AQI derivation for Sensor.Community data.
//!
//! This crate turns raw readings from the Sensor.Community network into a
//! standardized Air Quality Index for a set of configured locations, and
//! keeps a bounded rolling history of the results.
//!
//! # Features
//!
//! - **Sensor resolution**: Preferred sensor by id, falling back to the nearest one
//! - **Pollutant extraction**: PM2.5 / PM10 across firmware label spellings
//! - **AQI calculation**: Piecewise-linear breakpoint interpolation, worst pollutant wins
//! - **Classification**: Severity category, display colour and trend
//! - **Rolling history**: Time-windowed per-location samples for graphs
//! - **Data sources**: Live HTTP client (feature `client`) and a mock for tests
//!
//! # Pipeline
//!
//! ```text
//! API payload -> resolver -> extract -> aqi -> classify -> history
//! ```
//!
//! Nothing after the fetch can fail: a location with no usable data is
//! reported as "No data" and the rest of the pass continues.
//!
//! # Quick Start
//!
//! ```
//! use airgauge_core::{pipeline, MockSource, PipelineConfig};
//! use airgauge_types::{
//!     GeoLocation, History, Location, Measurement, PreviousState, SensorReading, SensorRef,
//! };
//! use time::OffsetDateTime;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let reading = SensorReading {
//!     sensor: Some(SensorRef { id: Some(1) }),
//!     location: Some(GeoLocation { latitude: "40.0".into(), longitude: "44.5".into() }),
//!     measurements: vec![Measurement::new("P2", "35.5"), Measurement::new("P1", "60")],
//!     ..Default::default()
//! };
//! let source = MockSource::new(vec![reading]);
//! let locations = [Location::new("home", "My Home", 40.0, 44.5)];
//! let mut history = History::default();
//!
//! let report = pipeline::run(
//!     &source,
//!     &locations,
//!     &PipelineConfig::default(),
//!     &PreviousState::default(),
//!     &mut history,
//!     OffsetDateTime::now_utc(),
//! )
//! .await;
//!
//! assert_eq!(report.locations[0].result.aqi, Some(101));
//! assert_eq!(history.entries("home").len(), 1);
//! # }
//! ```

pub mod aqi;
pub mod classify;
#[cfg(feature = "client")]
pub mod client;
pub mod error;
pub mod extract;
pub mod geo;
pub mod history;
pub mod mock;
pub mod pipeline;
pub mod resolver;
pub mod traits;
pub mod util;

// Re-export the shared types crate
pub use airgauge_types::types;

// Core exports
pub use aqi::{Breakpoint, PM10_BREAKPOINTS, PM25_BREAKPOINTS, aqi_for, combined_aqi};
pub use classify::{classify, trend};
#[cfg(feature = "client")]
pub use client::SensorCommunityClient;
pub use error::{Error, Result};
pub use extract::{Pollutant, extract};
pub use geo::distance_km;
pub use history::{DEFAULT_RETENTION, Window};
pub use mock::{MockSource, MockSourceBuilder};
pub use pipeline::{LocationReport, PipelineConfig, RunReport};
pub use resolver::{ById, ByNearest, Resolved, Resolver, SelectionStrategy, resolve};
pub use traits::SensorSource;

// Re-export from airgauge-types
pub use airgauge_types::{
    AqiResult, Category, History, HistoryEntry, Location, PollutantSample, PreviousState, Rgba,
    SensorReading, Trend,
};
