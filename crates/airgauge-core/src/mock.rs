//! Mock sensor source for testing.
//!
//! This module provides a [`SensorSource`] that serves canned readings
//! without touching the network.
//!
//! # Features
//!
//! - **Per-point payloads**: Serve different readings for each queried coordinate
//! - **Failure injection**: Fail every request, or only requests for one coordinate
//! - **Request accounting**: Count calls and record the queried coordinates

use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use airgauge_types::SensorReading;

use crate::error::{Error, Result};
use crate::traits::SensorSource;

/// Coordinates compared with this tolerance when matching a query.
const COORD_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone)]
enum Response {
    Readings(Vec<SensorReading>),
    Failure(String),
}

#[derive(Debug, Clone)]
struct Route {
    latitude: f64,
    longitude: f64,
    response: Response,
}

impl Route {
    fn matches(&self, latitude: f64, longitude: f64) -> bool {
        (self.latitude - latitude).abs() < COORD_EPSILON
            && (self.longitude - longitude).abs() < COORD_EPSILON
    }
}

/// A mock data source for testing.
///
/// Queries are answered from the first route whose coordinates match the
/// request; unmatched queries get the fallback payload (empty by default).
///
/// # Example
///
/// ```
/// use airgauge_core::{MockSource, SensorSource};
/// use airgauge_types::SensorReading;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let source = MockSource::builder()
///     .readings_at(40.0, 44.5, vec![SensorReading::default()])
///     .failure_at(41.0, 44.5, "connection refused")
///     .build();
///
/// assert_eq!(source.readings_near(40.0, 44.5, 2.0).await.unwrap().len(), 1);
/// assert!(source.readings_near(41.0, 44.5, 2.0).await.is_err());
/// assert_eq!(source.request_count(), 2);
/// # }
/// ```
#[derive(Debug)]
pub struct MockSource {
    routes: Vec<Route>,
    fallback: Response,
    request_count: AtomicU32,
    requests: Mutex<Vec<(f64, f64, f64)>>,
}

impl MockSource {
    /// A source that returns `readings` for every query.
    pub fn new(readings: Vec<SensorReading>) -> Self {
        MockSourceBuilder::new().readings(readings).build()
    }

    /// Start building a mock source.
    pub fn builder() -> MockSourceBuilder {
        MockSourceBuilder::new()
    }

    /// Number of queries served so far, failed ones included.
    pub fn request_count(&self) -> u32 {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Every `(latitude, longitude, radius_km)` queried, in order.
    pub fn requests(&self) -> Vec<(f64, f64, f64)> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SensorSource for MockSource {
    async fn readings_near(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<SensorReading>> {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push((latitude, longitude, radius_km));
        }

        let response = self
            .routes
            .iter()
            .find(|r| r.matches(latitude, longitude))
            .map_or(&self.fallback, |r| &r.response);

        match response {
            Response::Readings(readings) => Ok(readings.clone()),
            Response::Failure(message) => Err(Error::InvalidPayload(message.clone())),
        }
    }

    fn describe(&self) -> String {
        "mock source".to_string()
    }
}

/// Builder for [`MockSource`].
#[derive(Debug, Clone)]
pub struct MockSourceBuilder {
    routes: Vec<Route>,
    fallback: Response,
}

impl Default for MockSourceBuilder {
    fn default() -> Self {
        Self {
            routes: Vec::new(),
            fallback: Response::Readings(Vec::new()),
        }
    }
}

impl MockSourceBuilder {
    /// Create a builder with an empty fallback payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the payload returned for unmatched queries.
    pub fn readings(mut self, readings: Vec<SensorReading>) -> Self {
        self.fallback = Response::Readings(readings);
        self
    }

    /// Fail every unmatched query.
    pub fn fail_all(mut self, message: &str) -> Self {
        self.fallback = Response::Failure(message.to_string());
        self
    }

    /// Return `readings` for queries at `(latitude, longitude)`.
    pub fn readings_at(mut self, latitude: f64, longitude: f64, readings: Vec<SensorReading>) -> Self {
        self.routes.push(Route {
            latitude,
            longitude,
            response: Response::Readings(readings),
        });
        self
    }

    /// Fail queries at `(latitude, longitude)`.
    pub fn failure_at(mut self, latitude: f64, longitude: f64, message: &str) -> Self {
        self.routes.push(Route {
            latitude,
            longitude,
            response: Response::Failure(message.to_string()),
        });
        self
    }

    /// Build the mock source.
    pub fn build(self) -> MockSource {
        MockSource {
            routes: self.routes,
            fallback: self.fallback,
            request_count: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }
}
