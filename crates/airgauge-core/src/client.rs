//! HTTP client for the Sensor.Community data API.
//!
//! Only the area filter endpoint is used:
//!
//! ```text
//! GET {endpoint}/filter/area={lat},{lon},{radius_km}
//! ```
//!
//! which answers with a JSON array of the latest readings of every sensor
//! inside the circle.
//!
//! # Example
//!
//! ```no_run
//! use airgauge_core::client::SensorCommunityClient;
//! use airgauge_core::SensorSource;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SensorCommunityClient::new(SensorCommunityClient::DEFAULT_ENDPOINT)?;
//! let readings = client.readings_near(40.18, 44.51, 2.0).await?;
//! println!("{} sensors nearby", readings.len());
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use airgauge_types::SensorReading;

use crate::error::{Error, Result};
use crate::traits::SensorSource;

/// HTTP client for the Sensor.Community API.
#[derive(Debug, Clone)]
pub struct SensorCommunityClient {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl SensorCommunityClient {
    /// Public API root.
    pub const DEFAULT_ENDPOINT: &'static str = "https://data.sensor.community/airrohr/v1";

    /// Per-request deadline used by [`new`](Self::new).
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

    /// Create a client with the default timeout.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - The API root (e.g., "https://data.sensor.community/airrohr/v1")
    pub fn new(endpoint: &str) -> Result<Self> {
        Self::with_timeout(endpoint, Self::DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom per-request timeout.
    pub fn with_timeout(endpoint: &str, timeout: Duration) -> Result<Self> {
        let endpoint = normalize_endpoint(endpoint)?;

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("airgauge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    /// Get the API root.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build the area filter URL.
    pub fn area_url(&self, latitude: f64, longitude: f64, radius_km: f64) -> String {
        format!(
            "{}/filter/area={},{},{}",
            self.endpoint, latitude, longitude, radius_km
        )
    }

    /// Fetch all readings around a point.
    pub async fn fetch_area(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<SensorReading>> {
        let url = self.area_url(latitude, longitude, radius_km);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.request_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                url,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| self.request_error(&url, e))?;
        Ok(parse_readings(body))
    }

    fn request_error(&self, url: &str, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::timeout(format!("GET {url}"), self.timeout)
        } else if err.is_decode() {
            Error::InvalidPayload(err.to_string())
        } else {
            Error::NotReachable {
                url: url.to_string(),
                source: err,
            }
        }
    }
}

#[async_trait]
impl SensorSource for SensorCommunityClient {
    async fn readings_near(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<SensorReading>> {
        self.fetch_area(latitude, longitude, radius_km).await
    }

    fn describe(&self) -> String {
        self.endpoint.clone()
    }
}

/// Trim a trailing slash and require an http(s) scheme.
fn normalize_endpoint(endpoint: &str) -> Result<String> {
    let endpoint = endpoint.trim().trim_end_matches('/').to_string();
    if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
        return Err(Error::InvalidUrl(format!(
            "URL must start with http:// or https://, got: {}",
            endpoint
        )));
    }
    Ok(endpoint)
}

/// Decode an area response body.
///
/// A body that is not a JSON array yields no readings. Array elements that are
/// not objects are skipped. Fields of the wrong type inside an object read as
/// absent, so one odd field never drops the whole reading.
pub fn parse_readings(body: Value) -> Vec<SensorReading> {
    let Value::Array(items) = body else {
        warn!("Area response is not a JSON array, treating as empty");
        return Vec::new();
    };

    let total = items.len();
    let readings: Vec<SensorReading> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();

    if readings.len() < total {
        debug!(
            "Skipped {} malformed entries out of {}",
            total - readings.len(),
            total
        );
    }
    readings
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_creation() {
        let client = SensorCommunityClient::new(SensorCommunityClient::DEFAULT_ENDPOINT).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://data.sensor.community/airrohr/v1"
        );
    }

    #[test]
    fn test_client_normalizes_url() {
        let client = SensorCommunityClient::new("http://localhost:8080/api/").unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8080/api");
    }

    #[test]
    fn test_client_invalid_url() {
        let result = SensorCommunityClient::new("data.sensor.community");
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_area_url() {
        let client = SensorCommunityClient::new("https://example.org/v1").unwrap();
        assert_eq!(
            client.area_url(40.182, 44.515, 2.0),
            "https://example.org/v1/filter/area=40.182,44.515,2"
        );
        assert_eq!(
            client.area_url(-33.5, 151.25, 0.5),
            "https://example.org/v1/filter/area=-33.5,151.25,0.5"
        );
    }

    #[test]
    fn test_parse_readings_array() {
        let body = json!([
            {
                "sensor": {"id": 1},
                "timestamp": "2026-01-05 10:00:00",
                "location": {"latitude": "40.1", "longitude": "44.5"},
                "sensordatavalues": [{"value_type": "P2", "value": "8.1"}]
            },
            {
                "sensor": {"id": 2},
                "location": {"latitude": "40.2", "longitude": "44.6"},
                "sensordatavalues": []
            }
        ]);
        let readings = parse_readings(body);
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].sensor_id(), Some(1));
        assert_eq!(readings[1].timestamp(), None);
    }

    #[test]
    fn test_parse_readings_skips_malformed_entries() {
        let body = json!([
            "not an object",
            42,
            {"sensor": {"id": 3}}
        ]);
        let readings = parse_readings(body);
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].sensor_id(), Some(3));
    }

    #[test]
    fn test_parse_readings_keeps_entries_with_odd_fields() {
        let body = json!([
            {"sensor": {"id": "not a number"}},
            {"sensordatavalues": "nope"},
            {"timestamp": 1767607200, "sensor": {"id": 3}}
        ]);
        let readings = parse_readings(body);
        assert_eq!(readings.len(), 3);
        assert_eq!(readings[0].sensor_id(), None);
        assert!(readings[1].measurements.is_empty());
        assert_eq!(readings[2].timestamp(), None);
        assert_eq!(readings[2].sensor_id(), Some(3));
    }

    #[test]
    fn test_bad_measurement_does_not_hide_preferred_sensor() {
        let body = json!([
            {
                "sensor": {"id": 83131},
                "timestamp": "2026-01-05 10:00:00",
                "location": {"latitude": "40.0", "longitude": "44.5"},
                "sensordatavalues": [
                    {"value_type": null, "value": "1"},
                    {"value_type": "P2", "value": "35.5"}
                ]
            },
            {
                "sensor": {"id": 7},
                "timestamp": "2026-01-05 10:00:00",
                "location": {"latitude": "40.5", "longitude": "44.5"},
                "sensordatavalues": [{"value_type": "P2", "value": "5.0"}]
            }
        ]);
        let readings = parse_readings(body);
        assert_eq!(readings.len(), 2);

        let picked = crate::resolve(&readings, 40.0, 44.5, Some(83131)).unwrap();
        assert_eq!(picked.sensor_id(), Some(83131));

        let sample = crate::extract(picked);
        assert_eq!(sample.pm25, Some(35.5));
        assert_eq!(crate::combined_aqi(sample.pm25, sample.pm10), Some(101));
    }

    #[test]
    fn test_parse_readings_non_array() {
        assert!(parse_readings(json!({"error": "rate limited"})).is_empty());
        assert!(parse_readings(json!(null)).is_empty());
        assert!(parse_readings(json!([])).is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_error() {
        // Port 9 on localhost is reserved for discard and normally closed.
        let client =
            SensorCommunityClient::with_timeout("http://127.0.0.1:9", Duration::from_secs(2))
                .unwrap();
        let result = client.readings_near(0.0, 0.0, 1.0).await;
        assert!(result.is_err());
    }
}
