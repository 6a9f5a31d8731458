//! Trait abstraction over sensor data sources.
//!
//! The [`SensorSource`] trait lets the pipeline run against the live
//! Sensor.Community API or against a [`MockSource`](crate::mock::MockSource)
//! in tests.

use async_trait::async_trait;

use airgauge_types::SensorReading;

use crate::error::Result;

/// A source of raw sensor readings around a point.
///
/// # Example
///
/// ```
/// use airgauge_core::{MockSource, SensorSource};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> airgauge_core::Result<()> {
/// let source = MockSource::builder().build();
/// let readings = source.readings_near(40.18, 44.51, 2.0).await?;
/// assert!(readings.is_empty());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait SensorSource: Send + Sync {
    /// Fetch every reading within `radius_km` of `(latitude, longitude)`.
    ///
    /// An unreachable source, an HTTP error status or an unusable body is an
    /// `Err`. Individual malformed entries inside a usable body are dropped
    /// rather than failing the whole call.
    async fn readings_near(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<SensorReading>>;

    /// Short human-readable name for logs.
    fn describe(&self) -> String {
        "sensor source".to_string()
    }
}
