//! Pollutant extraction from a reading's measurement list.
//!
//! Sensor.Community firmware has used several spellings for the same
//! particulate channel over the years. Each known spelling maps to one
//! [`Pollutant`]; anything else is ignored. Matching is case-sensitive.

use airgauge_types::{PollutantSample, SensorReading};

/// Labels that carry PM2.5 concentrations.
pub const PM25_LABELS: &[&str] = &["P2", "SDS_P2", "PM2.5", "pm2.5"];

/// Labels that carry PM10 concentrations.
pub const PM10_LABELS: &[&str] = &["P1", "SDS_P1", "PM10", "pm10"];

/// A tracked particulate pollutant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pollutant {
    Pm25,
    Pm10,
}

impl Pollutant {
    /// Map a measurement label to a pollutant.
    ///
    /// ```
    /// use airgauge_core::extract::Pollutant;
    ///
    /// assert_eq!(Pollutant::from_label("SDS_P2"), Some(Pollutant::Pm25));
    /// assert_eq!(Pollutant::from_label("P1"), Some(Pollutant::Pm10));
    /// assert_eq!(Pollutant::from_label("temperature"), None);
    /// ```
    pub fn from_label(label: &str) -> Option<Self> {
        if PM25_LABELS.contains(&label) {
            Some(Pollutant::Pm25)
        } else if PM10_LABELS.contains(&label) {
            Some(Pollutant::Pm10)
        } else {
            None
        }
    }
}

/// Pull PM2.5 and PM10 out of a reading.
///
/// When a pollutant appears more than once, the last numeric value wins.
/// Values that do not coerce to a finite number are skipped and do not
/// overwrite an earlier valid one.
pub fn extract(reading: &SensorReading) -> PollutantSample {
    let mut sample = PollutantSample::default();
    for measurement in &reading.measurements {
        let Some(pollutant) = Pollutant::from_label(&measurement.value_type) else {
            continue;
        };
        let Some(value) = measurement.value.as_f64() else {
            continue;
        };
        match pollutant {
            Pollutant::Pm25 => sample.pm25 = Some(value),
            Pollutant::Pm10 => sample.pm10 = Some(value),
        }
    }
    sample
}
