//! Error types for airgauge-core.
//!
//! Only the data-source boundary can fail. Everything downstream of a
//! fetched payload (resolution, extraction, AQI, classification, history)
//! expresses "nothing usable" as `None` rather than an error.
//!
//! # Recovery
//!
//! | Error Type | Handling in the pipeline |
//! |------------|--------------------------|
//! | [`Error::Http`] | Location reported as "No data" |
//! | [`Error::NotReachable`] | Location reported as "No data" |
//! | [`Error::Api`] | Location reported as "No data" |
//! | [`Error::InvalidPayload`] | Location reported as "No data" |
//! | [`Error::Timeout`] | Location reported as "No data" |
//! | [`Error::InvalidUrl`] | Configuration error, fix and rerun |
//!
//! No error is retried; the next scheduled run simply tries again.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while fetching and decoding sensor data.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// HTTP request or body decoding failed.
    #[cfg(feature = "client")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The data source could not be reached.
    #[cfg(feature = "client")]
    #[error("Data source not reachable at {url}: {source}")]
    NotReachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The data source answered with a non-success status.
    #[error("Data source returned HTTP {status} for {url}")]
    Api { status: u16, url: String },

    /// The endpoint URL is malformed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The response body was not the expected shape.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// A request did not finish within its deadline.
    #[error("Operation '{operation}' timed out after {duration:?}")]
    Timeout {
        operation: String,
        duration: Duration,
    },
}

impl Error {
    /// Create a timeout error with operation context.
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidPayload(err.to_string())
    }
}

/// Result type alias using airgauge-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;
