//! Time helpers shared by the pipeline and its consumers.

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// RFC 3339 timestamp truncated to whole seconds.
///
/// Used for the "last update" variable and the previous-state snapshot.
///
/// # Example
///
/// ```
/// use airgauge_core::util::iso_seconds;
/// use time::macros::datetime;
///
/// let t = datetime!(2026-01-05 10:15:02.789 UTC);
/// assert_eq!(iso_seconds(t), "2026-01-05T10:15:02Z");
/// ```
pub fn iso_seconds(t: OffsetDateTime) -> String {
    let t = t.replace_nanosecond(0).unwrap_or(t);
    t.format(&Rfc3339).unwrap_or_else(|_| t.unix_timestamp().to_string())
}

/// Unix timestamp in fractional seconds.
pub fn unix_seconds(t: OffsetDateTime) -> f64 {
    t.unix_timestamp_nanos() as f64 / 1e9
}
