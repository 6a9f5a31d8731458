//! Sensor selection.
//!
//! A single Sensor.Community area query returns every sensor inside the
//! search radius. The resolver picks the one reading that represents a
//! configured location, using an ordered chain of [`SelectionStrategy`]s:
//!
//! 1. [`ById`]: the preferred sensor, if configured and present.
//! 2. [`ByNearest`]: otherwise the geographically closest sensor.
//!
//! The first strategy that yields a reading wins.
//!
//! # Example
//!
//! ```
//! use airgauge_core::resolver::Resolver;
//! use airgauge_types::{GeoLocation, Scalar, SensorReading, SensorRef};
//!
//! let reading = SensorReading {
//!     sensor: Some(SensorRef { id: Some(7) }),
//!     location: Some(GeoLocation {
//!         latitude: Scalar::from("40.0"),
//!         longitude: Scalar::from("44.5"),
//!     }),
//!     ..Default::default()
//! };
//!
//! let resolver = Resolver::for_target(40.01, 44.5, None);
//! let resolved = resolver.resolve(std::slice::from_ref(&reading)).unwrap();
//! assert_eq!(resolved.reading.sensor_id(), Some(7));
//! assert_eq!(resolved.strategy, "nearest");
//! ```

use airgauge_types::{Location, SensorReading};
use tracing::debug;

use crate::geo::distance_km;

/// A way of choosing one reading out of a payload.
pub trait SelectionStrategy: Send + Sync {
    /// Short name used in logs and run reports.
    fn name(&self) -> &'static str;

    /// Pick a reading, or `None` if no candidate qualifies.
    fn select<'a>(&self, readings: &'a [SensorReading]) -> Option<&'a SensorReading>;
}

/// Select the freshest reading of a specific sensor.
///
/// Among readings whose sensor id matches, the one with the greatest
/// timestamp string wins. Timestamps are ISO-like and compare correctly as
/// strings. A reading without a timestamp ranks below any reading with one,
/// so it is only chosen when it is the sole match. On equal timestamps the
/// first reading encountered is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ById {
    pub sensor_id: i64,
}

impl SelectionStrategy for ById {
    fn name(&self) -> &'static str {
        "sensor-id"
    }

    fn select<'a>(&self, readings: &'a [SensorReading]) -> Option<&'a SensorReading> {
        let mut best: Option<&SensorReading> = None;
        for reading in readings
            .iter()
            .filter(|r| r.sensor_id() == Some(self.sensor_id))
        {
            match best {
                Some(current) if reading.timestamp() <= current.timestamp() => {}
                _ => best = Some(reading),
            }
        }
        best
    }
}

/// Select the reading closest to a target point.
///
/// Readings with missing or malformed coordinates are skipped. On equal
/// distances the first reading encountered is kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ByNearest {
    pub latitude: f64,
    pub longitude: f64,
}

impl SelectionStrategy for ByNearest {
    fn name(&self) -> &'static str {
        "nearest"
    }

    fn select<'a>(&self, readings: &'a [SensorReading]) -> Option<&'a SensorReading> {
        let mut best: Option<(&SensorReading, f64)> = None;
        for reading in readings {
            let Some((lat, lon)) = reading.coordinates() else {
                continue;
            };
            let distance = distance_km(self.latitude, self.longitude, lat, lon);
            if !distance.is_finite() {
                continue;
            }
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((reading, distance));
            }
        }
        if let Some((reading, distance)) = best {
            debug!(
                "Nearest sensor {:?} at {:.3} km",
                reading.sensor_id(),
                distance
            );
        }
        best.map(|(reading, _)| reading)
    }
}

/// The outcome of a successful resolution.
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    /// The chosen reading.
    pub reading: &'a SensorReading,
    /// Name of the strategy that chose it.
    pub strategy: &'static str,
}

/// Ordered chain of selection strategies.
pub struct Resolver {
    strategies: Vec<Box<dyn SelectionStrategy>>,
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.strategies.iter().map(|s| s.name()).collect();
        f.debug_struct("Resolver")
            .field("strategies", &names)
            .finish()
    }
}

impl Resolver {
    /// Create a resolver from an explicit strategy chain.
    pub fn new(strategies: Vec<Box<dyn SelectionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Preferred sensor first (if any), then nearest to the target.
    pub fn for_target(latitude: f64, longitude: f64, preferred_sensor_id: Option<i64>) -> Self {
        let mut strategies: Vec<Box<dyn SelectionStrategy>> = Vec::with_capacity(2);
        if let Some(sensor_id) = preferred_sensor_id {
            strategies.push(Box::new(ById { sensor_id }));
        }
        strategies.push(Box::new(ByNearest {
            latitude,
            longitude,
        }));
        Self::new(strategies)
    }

    /// Resolver for a configured location.
    pub fn for_location(location: &Location) -> Self {
        Self::for_target(location.latitude, location.longitude, location.sensor_id)
    }

    /// Run the chain and return the first selection.
    pub fn resolve<'a>(&self, readings: &'a [SensorReading]) -> Option<Resolved<'a>> {
        self.strategies.iter().find_map(|strategy| {
            strategy.select(readings).map(|reading| Resolved {
                reading,
                strategy: strategy.name(),
            })
        })
    }
}

/// Select the reading that represents `(target_lat, target_lon)`.
///
/// Shorthand for [`Resolver::for_target`] followed by [`Resolver::resolve`].
pub fn resolve(
    readings: &[SensorReading],
    target_lat: f64,
    target_lon: f64,
    preferred_sensor_id: Option<i64>,
) -> Option<&SensorReading> {
    Resolver::for_target(target_lat, target_lon, preferred_sensor_id)
        .resolve(readings)
        .map(|r| r.reading)
}
