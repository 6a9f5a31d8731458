//! Utility functions for CLI operations.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use time::OffsetDateTime;

use airgauge_core::util::iso_seconds;

/// Write output to file or stdout.
pub fn write_output(output: Option<&PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }
        None => {
            print!("{}", content);
            io::stdout().flush()?;
        }
    }
    Ok(())
}

/// Format a unix timestamp in seconds as RFC 3339, or the raw number if out of range.
pub fn format_unix(ts: f64) -> String {
    if !ts.is_finite() {
        return ts.to_string();
    }
    OffsetDateTime::from_unix_timestamp_nanos((ts * 1e9) as i128)
        .map(iso_seconds)
        .unwrap_or_else(|_| ts.to_string())
}

/// Format an optional value, `-` when absent.
pub fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
