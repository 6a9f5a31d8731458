//! End-to-end tests of a polling pass against a mock data source.

use std::time::Duration;

use airgauge_core::pipeline::{self, PipelineConfig};
use airgauge_core::{MockSource, PM10_BREAKPOINTS, aqi_for};
use airgauge_types::{
    AqiResult, Category, GeoLocation, History, HistoryEntry, Location, Measurement, PreviousState,
    Rgba, SensorReading, SensorRef, Trend,
};
use time::OffsetDateTime;
use time::macros::datetime;

const HOME: (f64, f64) = (40.1811, 44.5136);
const OFFICE: (f64, f64) = (40.2000, 44.4900);

fn locations() -> Vec<Location> {
    vec![
        Location::new("home", "My Home", HOME.0, HOME.1),
        Location::new("office", "Office", OFFICE.0, OFFICE.1).with_sensor(500),
    ]
}

fn reading(id: i64, ts: &str, lat: f64, lon: f64, values: &[(&str, &str)]) -> SensorReading {
    SensorReading {
        sensor: Some(SensorRef { id: Some(id) }),
        timestamp: Some(ts.to_string()),
        timestamp_measured: None,
        location: Some(GeoLocation {
            latitude: lat.to_string().as_str().into(),
            longitude: lon.to_string().as_str().into(),
        }),
        measurements: values
            .iter()
            .map(|(t, v)| Measurement::new(*t, *v))
            .collect(),
    }
}

fn now() -> OffsetDateTime {
    datetime!(2026-01-05 10:00:00 UTC)
}

#[tokio::test]
async fn test_full_pass_two_locations() {
    let home_payload = vec![
        reading(1, "2026-01-05 09:58:00", 40.30, 44.51, &[("P2", "80.0")]),
        reading(2, "2026-01-05 09:59:00", 40.1812, 44.5136, &[("P2", "6.0"), ("P1", "10")]),
    ];
    let office_payload = vec![
        // Closer, but not the preferred sensor.
        reading(7, "2026-01-05 09:59:00", 40.2000, 44.4900, &[("P2", "1.0")]),
        reading(500, "2026-01-05 09:55:00", 40.21, 44.49, &[("SDS_P2", "35.4")]),
        reading(500, "2026-01-05 09:57:00", 40.21, 44.49, &[("SDS_P2", "35.5")]),
    ];
    let source = MockSource::builder()
        .readings_at(HOME.0, HOME.1, home_payload)
        .readings_at(OFFICE.0, OFFICE.1, office_payload)
        .build();

    let mut previous = PreviousState::default();
    previous.record("home", Some(30), "2026-01-05T09:00:00Z");
    previous.record("office", Some(101), "2026-01-05T09:00:00Z");

    let mut history = History::default();
    let report = pipeline::run(
        &source,
        &locations(),
        &PipelineConfig::default(),
        &previous,
        &mut history,
        now(),
    )
    .await;

    assert_eq!(source.request_count(), 2);
    assert_eq!(source.requests()[0], (HOME.0, HOME.1, 2.0));

    let home = &report.locations[0];
    assert_eq!(home.sensor_id, Some(2));
    assert_eq!(home.strategy, Some("nearest"));
    assert_eq!(home.result.aqi, Some(25));
    assert_eq!(home.result.category, Some(Category::Good));
    assert_eq!(home.result.trend, Trend::Down);

    let office = &report.locations[1];
    assert_eq!(office.sensor_id, Some(500));
    assert_eq!(office.strategy, Some("sensor-id"));
    assert_eq!(office.reading_timestamp.as_deref(), Some("2026-01-05 09:57:00"));
    assert_eq!(office.result.aqi, Some(101));
    assert_eq!(office.result.trend, Trend::Flat);

    assert_eq!(report.with_data(), 2);
    assert_eq!(report.state.aqi("home"), Some(25));
    assert_eq!(report.state.aqi("office"), Some(101));
    assert_eq!(
        report.state.locations["home"].updated_at,
        "2026-01-05T10:00:00Z"
    );

    assert_eq!(history.entries("home").len(), 1);
    assert_eq!(history.entries("office")[0].pm25, Some(35.5));
}

#[tokio::test]
async fn test_empty_payload_reports_no_data() {
    let source = MockSource::new(Vec::new());
    let mut previous = PreviousState::default();
    previous.record("home", Some(80), "2026-01-05T09:00:00Z");

    let mut history = History::default();
    let report = pipeline::run(
        &source,
        &locations()[..1],
        &PipelineConfig::default(),
        &previous,
        &mut history,
        now(),
    )
    .await;

    let home = &report.locations[0];
    assert_eq!(home.result, AqiResult::no_data());
    assert_eq!(home.result.label(), "No data");
    assert_eq!(home.result.color, Rgba::new(128, 128, 128, 180));
    assert_eq!(home.result.trend, Trend::Flat);
    assert!(home.error.is_none());

    // No-data runs are still recorded, so the next trend starts from scratch.
    assert_eq!(report.state.aqi("home"), None);
    assert!(report.state.locations.contains_key("home"));
    assert_eq!(history.entries("home")[0].aqi, None);
}

#[tokio::test]
async fn test_failing_location_does_not_abort_others() {
    let source = MockSource::builder()
        .failure_at(HOME.0, HOME.1, "connection reset")
        .readings_at(
            OFFICE.0,
            OFFICE.1,
            vec![reading(500, "2026-01-05 09:59:00", 40.2, 44.49, &[("P1", "60")])],
        )
        .build();

    let mut history = History::default();
    let report = pipeline::run(
        &source,
        &locations(),
        &PipelineConfig::default(),
        &PreviousState::default(),
        &mut history,
        now(),
    )
    .await;

    let home = &report.locations[0];
    assert!(home.is_no_data());
    assert!(home.error.as_deref().unwrap().contains("connection reset"));

    let office = &report.locations[1];
    assert_eq!(office.result.aqi, aqi_for(60.0, PM10_BREAKPOINTS));
    assert_eq!(office.sample.pm25, None);
    assert_eq!(report.with_data(), 1);
}

#[tokio::test]
async fn test_state_only_contains_current_locations() {
    let source = MockSource::new(Vec::new());
    let mut previous = PreviousState::default();
    previous.record("retired", Some(10), "2025-12-01T00:00:00Z");

    let mut history = History::default();
    let report = pipeline::run(
        &source,
        &locations(),
        &PipelineConfig::default(),
        &previous,
        &mut history,
        now(),
    )
    .await;

    assert!(!report.state.locations.contains_key("retired"));
    assert_eq!(report.state.locations.len(), 2);
}

#[tokio::test]
async fn test_history_pruned_relative_to_run_time() {
    let source = MockSource::new(vec![reading(
        1,
        "2026-01-05 09:59:00",
        HOME.0,
        HOME.1,
        &[("P2", "12.0")],
    )]);
    let run_ts = now().unix_timestamp() as f64;
    let retention = Duration::from_secs(3600);

    let mut history = History::default();
    history.series.insert(
        "home".to_string(),
        vec![
            HistoryEntry {
                timestamp: run_ts - 3601.0,
                aqi: Some(1),
                pm25: None,
                pm10: None,
            },
            HistoryEntry {
                timestamp: run_ts - 3600.0,
                aqi: Some(2),
                pm25: None,
                pm10: None,
            },
        ],
    );

    let config = PipelineConfig {
        radius_km: 1.5,
        retention,
    };
    pipeline::run(
        &source,
        &locations()[..1],
        &config,
        &PreviousState::default(),
        &mut history,
        now(),
    )
    .await;

    let aqis: Vec<_> = history.entries("home").iter().map(|e| e.aqi).collect();
    assert_eq!(aqis, vec![Some(2), Some(50)]);
    assert_eq!(source.requests()[0].2, 1.5);
}

#[tokio::test]
async fn test_report_serializes_for_json_output() {
    let source = MockSource::new(Vec::new());
    let mut history = History::default();
    let report = pipeline::run(
        &source,
        &locations()[..1],
        &PipelineConfig::default(),
        &PreviousState::default(),
        &mut history,
        now(),
    )
    .await;

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["started_at"], "2026-01-05T10:00:00Z");
    assert_eq!(json["locations"][0]["location"]["key"], "home");
    assert!(json["locations"][0]["result"]["aqi"].is_null());
    assert!(json.get("state").is_none());
}
