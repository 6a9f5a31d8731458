//! One polling pass over all configured locations.
//!
//! For each location, in order:
//!
//! 1. Fetch readings around the location from the [`SensorSource`].
//! 2. Resolve the representative reading ([`crate::resolver`]).
//! 3. Extract PM2.5 / PM10 ([`crate::extract`]).
//! 4. Derive the combined AQI ([`crate::aqi`]).
//! 5. Classify against the previous run ([`crate::classify`]).
//! 6. Append to the rolling history ([`crate::history`]).
//!
//! A failure at any step only affects its own location, which is reported
//! as "No data". Locations are processed sequentially and the pass never
//! fails as a whole.

use std::time::Duration;

use serde::Serialize;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use airgauge_types::{AqiResult, History, Location, PollutantSample, PreviousState, SensorReading};

use crate::aqi::combined_aqi;
use crate::classify;
use crate::extract::extract;
use crate::history::{DEFAULT_RETENTION, HistoryEntry};
use crate::resolver::Resolver;
use crate::traits::SensorSource;
use crate::util::{iso_seconds, unix_seconds};

/// Default search radius around each location, in kilometres.
pub const DEFAULT_RADIUS_KM: f64 = 2.0;

/// Tunables for a pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    /// Search radius for the area query.
    pub radius_km: f64,
    /// History retention window.
    pub retention: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            radius_km: DEFAULT_RADIUS_KM,
            retention: DEFAULT_RETENTION,
        }
    }
}

/// Everything computed for one location in one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationReport {
    pub location: Location,
    /// Sensor whose reading was used.
    pub sensor_id: Option<i64>,
    /// Name of the selection strategy that picked the sensor.
    pub strategy: Option<&'static str>,
    /// Timestamp of the chosen reading, as published.
    pub reading_timestamp: Option<String>,
    pub sample: PollutantSample,
    pub result: AqiResult,
    /// Why the location has no data, when the fetch failed.
    pub error: Option<String>,
}

impl LocationReport {
    /// Report for a location with no usable reading.
    pub fn no_data(location: &Location) -> Self {
        Self {
            location: location.clone(),
            sensor_id: None,
            strategy: None,
            reading_timestamp: None,
            sample: PollutantSample::default(),
            result: AqiResult::no_data(),
            error: None,
        }
    }

    /// Report for a location whose data source failed.
    pub fn failed(location: &Location, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::no_data(location)
        }
    }

    /// True when the location ended up without an AQI.
    pub fn is_no_data(&self) -> bool {
        self.result.aqi.is_none()
    }
}

/// Result of a full pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// When the pass started. Every history entry of the pass uses this time.
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    /// One report per configured location, in configuration order.
    pub locations: Vec<LocationReport>,
    /// State to persist for the next pass's trend computation.
    #[serde(skip)]
    pub state: PreviousState,
}

impl RunReport {
    /// `started_at` as whole-second RFC 3339.
    pub fn updated_at(&self) -> String {
        iso_seconds(self.started_at)
    }

    /// Number of locations that produced an AQI.
    pub fn with_data(&self) -> usize {
        self.locations.iter().filter(|l| !l.is_no_data()).count()
    }
}

/// Evaluate one location against an already-fetched payload.
///
/// Pure: no I/O and no history mutation.
pub fn evaluate(
    readings: &[SensorReading],
    location: &Location,
    previous_aqi: Option<u16>,
) -> LocationReport {
    let resolved = Resolver::for_location(location).resolve(readings);

    let Some(resolved) = resolved else {
        debug!(
            "No eligible reading for '{}' among {} candidates",
            location.key,
            readings.len()
        );
        return LocationReport::no_data(location);
    };

    let sample = extract(resolved.reading);
    let aqi = combined_aqi(sample.pm25, sample.pm10);
    LocationReport {
        location: location.clone(),
        sensor_id: resolved.reading.sensor_id(),
        strategy: Some(resolved.strategy),
        reading_timestamp: resolved.reading.timestamp().map(str::to_string),
        sample,
        result: classify::evaluate(aqi, previous_aqi),
        error: None,
    }
}

/// Run one pass over `locations`.
///
/// `history` is updated in place. The returned [`RunReport::state`] holds
/// only this pass's locations and replaces the previous state wholesale.
pub async fn run<S>(
    source: &S,
    locations: &[Location],
    config: &PipelineConfig,
    previous: &PreviousState,
    history: &mut History,
    now: OffsetDateTime,
) -> RunReport
where
    S: SensorSource + ?Sized,
{
    let timestamp = unix_seconds(now);
    let updated_at = iso_seconds(now);
    let mut reports = Vec::with_capacity(locations.len());
    let mut state = PreviousState::default();

    for location in locations {
        let previous_aqi = previous.aqi(&location.key);

        let report = match source
            .readings_near(location.latitude, location.longitude, config.radius_km)
            .await
        {
            Ok(readings) => {
                debug!(
                    "Fetched {} readings near '{}' from {}",
                    readings.len(),
                    location.key,
                    source.describe()
                );
                evaluate(&readings, location, previous_aqi)
            }
            Err(e) => {
                warn!("Fetching data for '{}' failed: {}", location.key, e);
                LocationReport::failed(location, e.to_string())
            }
        };

        info!(
            "{}: AQI {} ({}, {})",
            location.key,
            report.result.aqi_text(),
            report.result.label(),
            report.result.trend
        );

        state.record(&location.key, report.result.aqi, updated_at.clone());
        crate::history::append(
            history,
            &location.key,
            HistoryEntry {
                timestamp,
                aqi: report.result.aqi,
                pm25: report.sample.pm25,
                pm10: report.sample.pm10,
            },
            config.retention,
        );
        reports.push(report);
    }

    RunReport {
        started_at: now,
        locations: reports,
        state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use airgauge_types::{Category, GeoLocation, Measurement, SensorRef, Trend};

    fn reading(id: i64, lat: f64, lon: f64, pm25: &str, pm10: &str) -> SensorReading {
        SensorReading {
            sensor: Some(SensorRef { id: Some(id) }),
            timestamp: Some("2026-01-05 10:00:00".to_string()),
            timestamp_measured: None,
            location: Some(GeoLocation {
                latitude: lat.into(),
                longitude: lon.into(),
            }),
            measurements: vec![Measurement::new("P2", pm25), Measurement::new("P1", pm10)],
        }
    }

    #[test]
    fn test_evaluate_nearest() {
        let location = Location::new("home", "Home", 40.0, 44.5);
        let readings = vec![
            reading(1, 40.5, 44.5, "100.0", "200.0"),
            reading(2, 40.01, 44.5, "35.5", "60"),
        ];
        let report = evaluate(&readings, &location, Some(90));
        assert_eq!(report.sensor_id, Some(2));
        assert_eq!(report.strategy, Some("nearest"));
        assert_eq!(report.sample.pm25, Some(35.5));
        assert_eq!(report.result.aqi, Some(101));
        assert_eq!(report.result.category, Some(Category::UnhealthySensitive));
        assert_eq!(report.result.trend, Trend::Up);
        assert!(report.error.is_none());
    }

    #[test]
    fn test_evaluate_empty_payload_is_no_data() {
        let location = Location::new("home", "Home", 40.0, 44.5);
        let report = evaluate(&[], &location, Some(50));
        assert!(report.is_no_data());
        assert_eq!(report.result, AqiResult::no_data());
        assert!(report.sample.is_empty());
        assert!(report.error.is_none());
    }

    #[test]
    fn test_evaluate_reading_without_pollutants() {
        let location = Location::new("home", "Home", 40.0, 44.5);
        let mut r = reading(1, 40.0, 44.5, "1", "1");
        r.measurements = vec![Measurement::new("temperature", "20")];
        let report = evaluate(&[r], &location, None);
        assert_eq!(report.sensor_id, Some(1));
        assert!(report.is_no_data());
    }

    #[test]
    fn test_failed_report() {
        let location = Location::new("home", "Home", 40.0, 44.5);
        let report = LocationReport::failed(&location, "timeout");
        assert!(report.is_no_data());
        assert_eq!(report.error.as_deref(), Some("timeout"));
        assert_eq!(report.result.trend, Trend::Flat);
    }
}
