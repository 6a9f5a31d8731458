//! Core types for Sensor.Community readings and derived air-quality data.

use core::fmt;
use std::collections::BTreeMap;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseError;

/// A loosely-typed JSON scalar.
///
/// Sensor.Community publishes coordinates and measurement values as strings
/// (`"40.181"`), but other feeds use plain numbers. Anything that is neither
/// a number nor a string (null, bool, object) becomes [`Scalar::Other`] so
/// that a single odd field never rejects the whole reading.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Scalar {
    /// A JSON number.
    Number(f64),
    /// A JSON string, possibly holding a number.
    Text(String),
    /// Any other JSON value, or a missing field.
    #[default]
    Other,
}

impl Scalar {
    /// Coerce to a finite `f64`.
    ///
    /// Returns `None` for non-numeric text, NaN/infinite values, and
    /// [`Scalar::Other`].
    ///
    /// # Examples
    ///
    /// ```
    /// use airgauge_types::Scalar;
    ///
    /// assert_eq!(Scalar::Text(" 12.5 ".into()).as_f64(), Some(12.5));
    /// assert_eq!(Scalar::Number(3.0).as_f64(), Some(3.0));
    /// assert_eq!(Scalar::Text("n/a".into()).as_f64(), None);
    /// assert_eq!(Scalar::Other.as_f64(), None);
    /// ```
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Scalar::Number(n) => *n,
            Scalar::Text(s) => s.trim().parse::<f64>().ok()?,
            Scalar::Other => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::Number(n) => n.as_f64().map_or(Scalar::Other, Scalar::Number),
            serde_json::Value::String(s) => Scalar::Text(s),
            _ => Scalar::Other,
        })
    }
}

#[cfg(feature = "serde")]
impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Number(n) => serializer.serialize_f64(*n),
            Scalar::Text(s) => serializer.serialize_str(s),
            Scalar::Other => serializer.serialize_none(),
        }
    }
}

/// Field deserializers that turn a value of the wrong JSON type into "absent"
/// instead of failing the enclosing reading.
#[cfg(feature = "serde")]
mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Any `T`, or `None` if the value does not fit.
    pub fn option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(T::deserialize(value).ok())
    }

    /// A string, or the empty string for anything else.
    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        option(deserializer).map(Option::unwrap_or_default)
    }

    /// An integral JSON number. Strings and fractions are not ids.
    pub fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
                    .map(|f| f as i64)
            }),
            _ => None,
        })
    }

    /// Array elements that deserialize as `T`; a non-array is empty.
    pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| T::deserialize(item).ok())
                .collect(),
            _ => Vec::new(),
        })
    }
}

/// Sensor identity block of a Sensor.Community reading.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorRef {
    /// Numeric sensor identifier. Anything but an integer reads as `None`.
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "lenient::id"))]
    pub id: Option<i64>,
}

/// Declared position of a sensor.
///
/// Both coordinates are kept as raw [`Scalar`]s; use
/// [`SensorReading::coordinates`] to get validated numbers.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeoLocation {
    #[cfg_attr(feature = "serde", serde(default))]
    pub latitude: Scalar,
    #[cfg_attr(feature = "serde", serde(default))]
    pub longitude: Scalar,
}

/// One typed measurement inside a reading (`sensordatavalues[]`).
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Measurement {
    /// Measurement label, e.g. `P2` or `SDS_P1`. Empty if the feed sent a
    /// non-string.
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "lenient::string"))]
    pub value_type: String,
    /// Measured value, usually a numeric string.
    #[cfg_attr(feature = "serde", serde(default))]
    pub value: Scalar,
}

impl Measurement {
    /// Create a measurement from a label and value.
    pub fn new(value_type: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self {
            value_type: value_type.into(),
            value: value.into(),
        }
    }
}

/// A single raw reading as published by the Sensor.Community API.
///
/// Readings are transient: they are fetched fresh on every run and never
/// persisted. Every field is optional on the wire, so a partially broken
/// entry still deserializes and is simply ineligible where data is missing.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorReading {
    /// Sensor identity.
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "lenient::option"))]
    pub sensor: Option<SensorRef>,
    /// Primary timestamp (`YYYY-MM-DD HH:MM:SS`, UTC).
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            deserialize_with = "lenient::option",
            skip_serializing_if = "Option::is_none"
        )
    )]
    pub timestamp: Option<String>,
    /// Fallback timestamp used by some feeds.
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            deserialize_with = "lenient::option",
            skip_serializing_if = "Option::is_none"
        )
    )]
    pub timestamp_measured: Option<String>,
    /// Declared sensor position.
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "lenient::option"))]
    pub location: Option<GeoLocation>,
    /// Ordered list of typed measurements. Entries that are not objects are
    /// dropped.
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            rename = "sensordatavalues",
            deserialize_with = "lenient::list"
        )
    )]
    pub measurements: Vec<Measurement>,
}

impl SensorReading {
    /// The sensor's numeric identifier, if present.
    #[must_use]
    pub fn sensor_id(&self) -> Option<i64> {
        self.sensor.as_ref().and_then(|s| s.id)
    }

    /// The reading's timestamp.
    ///
    /// `timestamp` wins when present and non-empty, otherwise
    /// `timestamp_measured` is used.
    #[must_use]
    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.timestamp_measured.as_deref().filter(|s| !s.is_empty()))
    }

    /// Validated `(latitude, longitude)` pair.
    ///
    /// Returns `None` if either coordinate is missing, non-numeric or outside
    /// the valid geographic range.
    ///
    /// # Examples
    ///
    /// ```
    /// use airgauge_types::{GeoLocation, SensorReading, Scalar};
    ///
    /// let reading = SensorReading {
    ///     location: Some(GeoLocation {
    ///         latitude: Scalar::Text("40.18".into()),
    ///         longitude: Scalar::Number(44.51),
    ///     }),
    ///     ..Default::default()
    /// };
    /// assert_eq!(reading.coordinates(), Some((40.18, 44.51)));
    /// ```
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let location = self.location.as_ref()?;
        let lat = location.latitude.as_f64()?;
        let lon = location.longitude.as_f64()?;
        if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) {
            Some((lat, lon))
        } else {
            None
        }
    }
}

/// A configured location to monitor.
///
/// Locations are static configuration and never change during a run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Location {
    /// Unique key, used for snapshot maps and output variable names.
    pub key: String,
    /// Human-readable display name.
    pub name: String,
    /// Latitude in degrees.
    #[cfg_attr(feature = "serde", serde(alias = "lat"))]
    pub latitude: f64,
    /// Longitude in degrees.
    #[cfg_attr(feature = "serde", serde(alias = "lon"))]
    pub longitude: f64,
    /// Sensor to prefer over the nearest one, if it reports.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub sensor_id: Option<i64>,
}

impl Location {
    /// Create a location without a preferred sensor.
    pub fn new(key: impl Into<String>, name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            latitude: lat,
            longitude: lon,
            sensor_id: None,
        }
    }

    /// Set the preferred sensor.
    #[must_use]
    pub fn with_sensor(mut self, sensor_id: i64) -> Self {
        self.sensor_id = Some(sensor_id);
        self
    }
}

/// Particulate concentrations (µg/m³) extracted from one reading.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PollutantSample {
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
}

impl PollutantSample {
    /// True when neither pollutant was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pm25.is_none() && self.pm10.is_none()
    }
}

/// An opaque-or-translucent display colour.
///
/// `Display` renders the `r,g,b,a` form consumed by desktop widgets;
/// `FromStr` additionally accepts `#rrggbb` and `#rrggbbaa`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Create a colour from its components.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Colour used when a location has no data.
    pub const NO_DATA: Rgba = Rgba::new(128, 128, 128, 180);

    /// Components as an array, in RGBA order.
    #[must_use]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.r, self.g, self.b, self.a)
    }
}

impl FromStr for Rgba {
    type Err = ParseError;

    /// Parse `r,g,b,a`, `r,g,b`, `#rrggbb` or `#rrggbbaa`.
    ///
    /// # Examples
    ///
    /// ```
    /// use airgauge_types::Rgba;
    ///
    /// assert_eq!("0,255,128,220".parse::<Rgba>().unwrap(), Rgba::new(0, 255, 128, 220));
    /// assert_eq!("#ff5599".parse::<Rgba>().unwrap(), Rgba::new(255, 85, 153, 255));
    /// assert!("blue".parse::<Rgba>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || ParseError::InvalidColor(s.to_string());

        if let Some(hex) = s.strip_prefix('#') {
            if !matches!(hex.len(), 6 | 8) || !hex.is_ascii() {
                return Err(invalid());
            }
            let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
            let a = if hex.len() == 8 { byte(6)? } else { 255 };
            return Ok(Rgba::new(byte(0)?, byte(2)?, byte(4)?, a));
        }

        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<u8>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;
        match parts.as_slice() {
            [r, g, b] => Ok(Rgba::new(*r, *g, *b, 255)),
            [r, g, b, a] => Ok(Rgba::new(*r, *g, *b, *a)),
            _ => Err(invalid()),
        }
    }
}

#[cfg(feature = "serde")]
impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// AQI severity band.
///
/// Ordered by severity so that `category >= Category::Unhealthy` works.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Category {
    /// AQI 0-50.
    Good,
    /// AQI 51-100.
    Moderate,
    /// AQI 101-150.
    UnhealthySensitive,
    /// AQI 151-200.
    Unhealthy,
    /// AQI 201-300.
    VeryUnhealthy,
    /// AQI above 300.
    Hazardous,
}

impl Category {
    /// All categories, least severe first.
    pub const ALL: [Category; 6] = [
        Category::Good,
        Category::Moderate,
        Category::UnhealthySensitive,
        Category::Unhealthy,
        Category::VeryUnhealthy,
        Category::Hazardous,
    ];

    /// Label shown by the desktop widget.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Category::Good => "Good",
            Category::Moderate => "Moderate",
            Category::UnhealthySensitive => "Unhealthy for sensitive",
            Category::Unhealthy => "Unhealthy",
            Category::VeryUnhealthy => "Very unhealthy",
            Category::Hazardous => "Hazardous",
        }
    }

    /// Display colour for this band.
    #[must_use]
    pub fn color(&self) -> Rgba {
        match self {
            Category::Good => Rgba::new(0, 255, 128, 220),
            Category::Moderate => Rgba::new(255, 220, 0, 220),
            Category::UnhealthySensitive => Rgba::new(255, 153, 0, 220),
            Category::Unhealthy => Rgba::new(255, 51, 51, 220),
            Category::VeryUnhealthy => Rgba::new(186, 85, 211, 220),
            Category::Hazardous => Rgba::new(128, 0, 64, 220),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Direction of change against the previous run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Trend {
    Up,
    Down,
    #[default]
    Flat,
}

impl Trend {
    /// Icon token understood by the widget skin.
    #[must_use]
    pub fn icon(&self) -> &'static str {
        match self {
            Trend::Up => "arrow_up",
            Trend::Down => "arrow_down",
            Trend::Flat => "arrow_flat",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Up => write!(f, "rising"),
            Trend::Down => write!(f, "falling"),
            Trend::Flat => write!(f, "steady"),
        }
    }
}

/// Label used when a location has no AQI.
pub const NO_DATA_LABEL: &str = "No data";

/// Fully classified air-quality result for one location.
///
/// An absent `aqi` is the "No data" state: `category` is `None`, the colour is
/// [`Rgba::NO_DATA`] and the trend is always [`Trend::Flat`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AqiResult {
    pub aqi: Option<u16>,
    pub category: Option<Category>,
    pub color: Rgba,
    pub trend: Trend,
}

impl AqiResult {
    /// The "No data" presentation state.
    #[must_use]
    pub const fn no_data() -> Self {
        Self {
            aqi: None,
            category: None,
            color: Rgba::NO_DATA,
            trend: Trend::Flat,
        }
    }

    /// Category label, or `"No data"`.
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.category.map_or(NO_DATA_LABEL, |c| c.label())
    }

    /// AQI as display text, `-` when absent.
    #[must_use]
    pub fn aqi_text(&self) -> String {
        self.aqi.map_or_else(|| "-".to_string(), |v| v.to_string())
    }
}

impl Default for AqiResult {
    fn default() -> Self {
        Self::no_data()
    }
}

/// One sample in a location's rolling history.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HistoryEntry {
    /// Unix timestamp in seconds.
    #[cfg_attr(feature = "serde", serde(rename = "ts"))]
    pub timestamp: f64,
    pub aqi: Option<u16>,
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
}

/// Rolling per-location history, keyed by location key.
///
/// Each sequence is ordered oldest first. Appending and pruning live in
/// `airgauge_core::history`; this type only owns the data.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct History {
    pub series: BTreeMap<String, Vec<HistoryEntry>>,
}

impl History {
    /// Entries for one location, oldest first.
    #[must_use]
    pub fn entries(&self, key: &str) -> &[HistoryEntry] {
        self.series.get(key).map_or(&[], Vec::as_slice)
    }

    /// Total number of entries across all locations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.values().map(Vec::len).sum()
    }

    /// True when no location has any entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What the previous run recorded for one location.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StateEntry {
    pub aqi: Option<u16>,
    /// RFC 3339 time of the run that wrote this entry.
    #[cfg_attr(feature = "serde", serde(rename = "updated"))]
    pub updated_at: String,
}

/// Snapshot of the previous run, keyed by location key.
///
/// Overwritten wholesale each run; only used to compute trends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PreviousState {
    pub locations: BTreeMap<String, StateEntry>,
}

impl PreviousState {
    /// Previous AQI for a location, if it had one.
    #[must_use]
    pub fn aqi(&self, key: &str) -> Option<u16> {
        self.locations.get(key).and_then(|e| e.aqi)
    }

    /// Record this run's AQI for a location.
    pub fn record(&mut self, key: impl Into<String>, aqi: Option<u16>, updated_at: impl Into<String>) {
        self.locations.insert(
            key.into(),
            StateEntry {
                aqi,
                updated_at: updated_at.into(),
            },
        );
    }
}
