//! Rolling per-location AQI history.
//!
//! Each run appends one [`HistoryEntry`] per location and prunes entries
//! older than the retention window. Age is measured against the entry just
//! appended rather than the wall clock, so one run's pruning is
//! self-consistent even if it runs slowly.
//!
//! The [`Window`] type describes the time span a graph covers and maps
//! history entries onto plot coordinates.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use airgauge_core::history::{append, HistoryEntry};
//! use airgauge_types::History;
//!
//! let mut history = History::default();
//! let retention = Duration::from_secs(3600);
//!
//! append(&mut history, "home", HistoryEntry { timestamp: 0.0, aqi: Some(40), pm25: None, pm10: None }, retention);
//! append(&mut history, "home", HistoryEntry { timestamp: 3601.0, aqi: Some(42), pm25: None, pm10: None }, retention);
//!
//! assert_eq!(history.entries("home").len(), 1);
//! ```

use std::time::Duration;

use tracing::debug;

pub use airgauge_types::HistoryEntry;
use airgauge_types::History;

/// Default retention window: 24 hours.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(24 * 3600);

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Append `entry` to `key`'s sequence and prune it to `retention`.
///
/// An entry is kept iff `entry.timestamp - kept.timestamp <= retention`.
/// The boundary is inclusive. Order is preserved and same-timestamp
/// entries are not deduplicated.
pub fn append(history: &mut History, key: &str, entry: HistoryEntry, retention: Duration) {
    let entries = history.series.entry(key.to_string()).or_default();
    entries.push(entry);

    let before = entries.len();
    prune(entries, entry.timestamp, retention);
    let dropped = before - entries.len();
    if dropped > 0 {
        debug!("Pruned {} history entries for '{}'", dropped, key);
    }
}

/// Drop entries older than `retention` relative to `latest`.
pub fn prune(entries: &mut Vec<HistoryEntry>, latest: f64, retention: Duration) {
    let max_age = retention.as_secs_f64();
    entries.retain(|e| latest - e.timestamp <= max_age);
}

/// The span of time a graph covers, in unix seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    pub start: f64,
    pub end: f64,
}

impl Window {
    /// The `retention`-long window ending at `now`.
    pub fn ending_at(now: f64, retention: Duration) -> Self {
        Self {
            start: now - retention.as_secs_f64(),
            end: now,
        }
    }

    /// Window length in hours.
    pub fn hours(&self) -> f64 {
        (self.end - self.start) / SECONDS_PER_HOUR
    }

    /// True if `timestamp` falls inside the window.
    pub fn contains(&self, timestamp: f64) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }

    /// Plot points `(hours since window start, aqi)` for the given entries.
    ///
    /// Entries without an AQI or outside the window are skipped.
    pub fn points(&self, entries: &[HistoryEntry]) -> Vec<(f64, u16)> {
        entries
            .iter()
            .filter(|e| self.contains(e.timestamp))
            .filter_map(|e| {
                e.aqi
                    .map(|aqi| ((e.timestamp - self.start) / SECONDS_PER_HOUR, aqi))
            })
            .collect()
    }
}
