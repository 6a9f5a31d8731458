//! History export.

use serde::Serialize;

use airgauge_types::History;

use crate::error::Result;

/// One flattened history row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRow<'a> {
    pub location: &'a str,
    pub ts: f64,
    pub aqi: Option<u16>,
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
}

/// Flatten the history into rows, optionally for a single location.
///
/// Rows are grouped by location key (sorted) and oldest first within a
/// location.
pub fn rows<'a>(history: &'a History, location: Option<&str>) -> Vec<HistoryRow<'a>> {
    history
        .series
        .iter()
        .filter(|(key, _)| location.is_none_or(|l| l == key.as_str()))
        .flat_map(|(key, entries)| {
            entries.iter().map(move |e| HistoryRow {
                location: key.as_str(),
                ts: e.timestamp,
                aqi: e.aqi,
                pm25: e.pm25,
                pm10: e.pm10,
            })
        })
        .collect()
}

/// Render rows as CSV with a header line. Absent values are empty fields.
pub fn to_csv(rows: &[HistoryRow<'_>]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    if rows.is_empty() {
        writer.write_record(["location", "ts", "aqi", "pm25", "pm10"])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use airgauge_types::HistoryEntry;

    fn history() -> History {
        let mut history = History::default();
        history.series.insert(
            "office".to_string(),
            vec![HistoryEntry {
                timestamp: 5.0,
                aqi: Some(60),
                pm25: Some(16.2),
                pm10: Some(20.0),
            }],
        );
        history.series.insert(
            "home".to_string(),
            vec![
                HistoryEntry {
                    timestamp: 1.0,
                    aqi: Some(10),
                    pm25: Some(2.5),
                    pm10: None,
                },
                HistoryEntry {
                    timestamp: 2.0,
                    aqi: None,
                    pm25: None,
                    pm10: None,
                },
            ],
        );
        history
    }

    #[test]
    fn test_rows_all_locations() {
        let history = history();
        let rows = rows(&history, None);
        let keys: Vec<_> = rows.iter().map(|r| r.location).collect();
        assert_eq!(keys, vec!["home", "home", "office"]);
    }

    #[test]
    fn test_rows_filtered() {
        let history = history();
        let rows = rows(&history, Some("office"));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].aqi, Some(60));
        assert!(super::rows(&history, Some("missing")).is_empty());
    }

    #[test]
    fn test_csv_output() {
        let history = history();
        let csv = to_csv(&rows(&history, Some("home"))).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "location,ts,aqi,pm25,pm10");
        assert_eq!(lines[1], "home,1.0,10,2.5,");
        assert_eq!(lines[2], "home,2.0,,,");
    }

    #[test]
    fn test_csv_empty_has_header() {
        let csv = to_csv(&[]).unwrap();
        assert_eq!(csv.trim_end(), "location,ts,aqi,pm25,pm10");
    }
}
