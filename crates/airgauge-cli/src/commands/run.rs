//! Run command: one polling pass and the widget files it produces.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use time::OffsetDateTime;
use tracing::{debug, info};

use airgauge_core::util::unix_seconds;
use airgauge_core::{RunReport, SensorCommunityClient, SensorSource, Window, pipeline};
use airgauge_store::Store;
use airgauge_types::History;

use crate::cli::RunArgs;
use crate::config::Config;
use crate::output::{GraphStyle, graph, vars};
use crate::util::write_output;

pub async fn cmd_run(
    config: &Config,
    args: &RunArgs,
    quiet: bool,
    output: Option<&PathBuf>,
) -> Result<()> {
    let client = SensorCommunityClient::with_timeout(&config.endpoint, config.timeout())
        .context("Failed to create HTTP client")?;
    let store = Store::at(config.output_dir());

    let report = execute(&client, config, &store, OffsetDateTime::now_utc(), args.dry_run).await?;

    if args.json {
        let mut json = serde_json::to_string_pretty(&report)?;
        json.push('\n');
        write_output(output, &json)?;
    } else if !quiet {
        write_output(output, &summary(&report))?;
    }
    Ok(())
}

/// Poll every configured location and, unless `dry_run`, write the
/// variable file, both snapshots and the graphs.
pub async fn execute<S>(
    source: &S,
    config: &Config,
    store: &Store,
    now: OffsetDateTime,
    dry_run: bool,
) -> Result<RunReport>
where
    S: SensorSource + ?Sized,
{
    let locations = config.locations();
    let previous = store.load_state();
    let mut history = store.load_history();

    info!(
        "Polling {} location(s) from {}",
        locations.len(),
        source.describe()
    );
    let report = pipeline::run(
        source,
        &locations,
        &config.pipeline_config(),
        &previous,
        &mut history,
        now,
    )
    .await;

    let vars = vars::render(&report);
    if dry_run {
        info!("Dry run, nothing written to {}", store.dir().display());
        debug!("Variable file would be:\n{}", vars);
        return Ok(report);
    }

    let path = store
        .write_vars(&vars)
        .context("Failed to write variable file")?;
    debug!("Wrote {}", path.display());
    store
        .save_state(&report.state)
        .context("Failed to save previous-run state")?;
    store
        .save_history(&history)
        .context("Failed to save history")?;

    if config.graph.enabled {
        write_graphs(config, store, &history, now)?;
    }

    info!(
        "{} of {} location(s) have data",
        report.with_data(),
        report.locations.len()
    );
    Ok(report)
}

fn write_graphs(
    config: &Config,
    store: &Store,
    history: &History,
    now: OffsetDateTime,
) -> Result<()> {
    let window = Window::ending_at(unix_seconds(now), config.retention());
    for (index, location) in config.locations.iter().enumerate() {
        let style = GraphStyle {
            width: config.graph.width,
            height: config.graph.height,
            line: location.line_color(index),
            label: &location.name,
        };
        match graph::render(history.entries(&location.key), &window, &style)? {
            Some(png) => {
                let path = store
                    .write_graph(&location.key, &png)
                    .with_context(|| format!("Failed to write graph for '{}'", location.key))?;
                debug!("Wrote {}", path.display());
            }
            None => info!("No data to plot for '{}', graph skipped", location.key),
        }
    }
    Ok(())
}

/// One line per location: `name: AQI n (Category) trend`.
pub fn summary(report: &RunReport) -> String {
    let mut out = String::new();
    for loc in &report.locations {
        let _ = write!(
            out,
            "{}: AQI {} ({}) {}",
            loc.location.name,
            loc.result.aqi_text(),
            loc.result.label(),
            loc.result.trend
        );
        if let Some(err) = &loc.error {
            let _ = write!(out, " [{err}]");
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use airgauge_core::MockSource;
    use airgauge_store::{HISTORY_FILE, STATE_FILE, VARS_FILE};
    use airgauge_types::{SensorReading, Trend};
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;
    use time::Duration;
    use time::macros::datetime;

    use crate::config::LocationConfig;

    fn reading(id: i64, pm25: &str) -> SensorReading {
        serde_json::from_value(json!({
            "sensor": {"id": id},
            "timestamp": "2026-01-05 09:59:00",
            "location": {"latitude": "40.0005", "longitude": "44.5"},
            "sensordatavalues": [{"value_type": "P2", "value": pm25}],
        }))
        .unwrap()
    }

    fn config(dir: &TempDir) -> Config {
        Config {
            output_dir: Some(dir.path().join("out")),
            locations: vec![
                LocationConfig {
                    key: "home".to_string(),
                    name: "My Home".to_string(),
                    lat: 40.0,
                    lon: 44.5,
                    sensor_id: None,
                    color: None,
                },
                LocationConfig {
                    key: "vanya".to_string(),
                    name: "Vanya's Home".to_string(),
                    lat: 40.2,
                    lon: 44.5,
                    sensor_id: None,
                    color: None,
                },
            ],
            ..Default::default()
        }
    }

    fn source(pm25: &str) -> MockSource {
        MockSource::builder()
            .readings_at(40.0, 44.5, vec![reading(1, pm25)])
            .failure_at(40.2, 44.5, "connection refused")
            .build()
    }

    fn now() -> OffsetDateTime {
        datetime!(2026-01-05 10:00:00 UTC)
    }

    #[tokio::test]
    async fn test_execute_writes_all_files() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        let store = Store::at(config.output_dir());

        let report = execute(&source("10.0"), &config, &store, now(), false)
            .await
            .unwrap();
        assert_eq!(report.locations[0].result.aqi, Some(42));
        assert!(report.locations[1].is_no_data());

        let out = dir.path().join("out");
        let vars = fs::read_to_string(out.join(VARS_FILE)).unwrap();
        assert!(vars.starts_with("[Variables]\nAQI_Home=42\n"));
        assert!(vars.contains("AQI_Vanya=-\n"));
        assert!(vars.ends_with("AQI_LastUpdateUTC=2026-01-05T10:00:00Z\n"));

        assert!(out.join(STATE_FILE).exists());
        assert!(out.join(HISTORY_FILE).exists());
        assert!(out.join("aqi_graph_home.png").exists());
        assert!(!out.join("aqi_graph_vanya.png").exists());

        let history = store.load_history();
        assert_eq!(history.entries("home").len(), 1);
        assert_eq!(history.entries("vanya").len(), 1);
        assert_eq!(store.load_state().aqi("home"), Some(42));
    }

    #[tokio::test]
    async fn test_second_run_computes_trend() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        let store = Store::at(config.output_dir());

        execute(&source("10.0"), &config, &store, now(), false)
            .await
            .unwrap();
        let report = execute(
            &source("20.0"),
            &config,
            &store,
            now() + Duration::minutes(10),
            false,
        )
        .await
        .unwrap();

        assert_eq!(report.locations[0].result.aqi, Some(68));
        assert_eq!(report.locations[0].result.trend, Trend::Up);
        assert_eq!(store.load_history().entries("home").len(), 2);
        assert!(
            fs::read_to_string(store.vars_path())
                .unwrap()
                .contains("AQI_HomeTrendIcon=arrow_up\n")
        );
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        let store = Store::at(config.output_dir());

        let report = execute(&source("10.0"), &config, &store, now(), true)
            .await
            .unwrap();
        assert_eq!(report.with_data(), 1);
        assert!(!dir.path().join("out").exists());
    }

    #[tokio::test]
    async fn test_graphs_disabled() {
        let dir = TempDir::new().unwrap();
        let mut config = config(&dir);
        config.graph.enabled = false;
        let store = Store::at(config.output_dir());

        execute(&source("10.0"), &config, &store, now(), false)
            .await
            .unwrap();
        assert!(store.vars_path().exists());
        assert!(!store.graph_path("home").exists());
    }

    #[tokio::test]
    async fn test_summary() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        let store = Store::at(config.output_dir());

        let report = execute(&source("10.0"), &config, &store, now(), true)
            .await
            .unwrap();
        let text = summary(&report);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "My Home: AQI 42 (Good) steady");
        assert!(lines[1].starts_with("Vanya's Home: AQI - (No data) steady ["));
    }
}
