//! Rainmeter `[Variables]` file rendering.

use std::fmt::Write;

use airgauge_core::{LocationReport, RunReport};

/// Variable name prefix for a location key: first character upper-cased,
/// the rest lower-cased.
pub fn prefix(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Format a concentration, `-` when absent. Whole numbers keep one decimal.
pub fn format_pm(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() && v.fract() == 0.0 => format!("{v:.1}"),
        Some(v) => v.to_string(),
        None => "-".to_string(),
    }
}

fn write_location(out: &mut String, report: &LocationReport) {
    let p = prefix(&report.location.key);
    let result = &report.result;
    let _ = writeln!(out, "AQI_{p}={}", result.aqi_text());
    let _ = writeln!(out, "AQI_{p}Color={}", result.color);
    let _ = writeln!(out, "AQI_{p}TrendIcon={}", result.trend.icon());
    let _ = writeln!(out, "AQI_{p}Category={}", result.label());
    let _ = writeln!(out, "AQI_{p}Name={}", report.location.name);
    let _ = writeln!(out, "{p}_PM25={}", format_pm(report.sample.pm25));
    let _ = writeln!(out, "{p}_PM10={}", format_pm(report.sample.pm10));
}

/// Render the full variable file for a run.
pub fn render(report: &RunReport) -> String {
    let mut out = String::from("[Variables]\n");
    for location in &report.locations {
        write_location(&mut out, location);
    }
    let _ = writeln!(out, "AQI_LastUpdateUTC={}", report.updated_at());
    out
}
