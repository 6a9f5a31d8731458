//! History command implementation.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::Result;
use tracing::warn;

use airgauge_store::{HistoryRow, Store};

use crate::cli::HistoryFormat;
use crate::config::Config;
use crate::util::{format_unix, or_dash, write_output};

pub fn cmd_history(
    config: &Config,
    location: Option<&str>,
    format: HistoryFormat,
    output: Option<&PathBuf>,
) -> Result<()> {
    let store = Store::at(config.output_dir());
    let history = store.load_history();
    let rows = airgauge_store::rows(&history, location);

    if rows.is_empty() {
        match location {
            Some(key) => warn!("No history for location '{}'", key),
            None => warn!("No history in {}", store.dir().display()),
        }
    }

    let content = render(&rows, format)?;
    write_output(output, &content)
}

/// Render history rows in the requested format.
pub fn render(rows: &[HistoryRow<'_>], format: HistoryFormat) -> Result<String> {
    Ok(match format {
        HistoryFormat::Json => {
            let mut json = serde_json::to_string_pretty(rows)?;
            json.push('\n');
            json
        }
        HistoryFormat::Csv => airgauge_store::to_csv(rows)?,
        HistoryFormat::Text => format_text(rows),
    })
}

fn format_text(rows: &[HistoryRow<'_>]) -> String {
    let width = rows
        .iter()
        .map(|r| r.location.len())
        .max()
        .unwrap_or(0)
        .max("LOCATION".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<width$}  {:<20}  {:>5}  {:>7}  {:>7}",
        "LOCATION", "TIME", "AQI", "PM2.5", "PM10"
    );
    for row in rows {
        let _ = writeln!(
            out,
            "{:<width$}  {:<20}  {:>5}  {:>7}  {:>7}",
            row.location,
            format_unix(row.ts),
            or_dash(row.aqi),
            or_dash(row.pm25),
            or_dash(row.pm10),
        );
    }
    out
}
