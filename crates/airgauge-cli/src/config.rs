//! Configuration file management.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use airgauge_core::{PipelineConfig, SensorCommunityClient};
use airgauge_types::{Location, Rgba};

/// Line colours handed out to locations that do not set one.
const PALETTE: [Rgba; 4] = [
    Rgba::new(0, 255, 128, 255),
    Rgba::new(255, 85, 153, 255),
    Rgba::new(80, 170, 255, 255),
    Rgba::new(255, 200, 60, 255),
];

/// Smallest graph that still fits the axis labels.
const MIN_GRAPH_WIDTH: u32 = 64;
const MIN_GRAPH_HEIGHT: u32 = 48;

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Sensor.Community API base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Search radius around each location, in kilometres
    #[serde(default = "default_radius_km")]
    pub radius_km: f64,

    /// How long history entries are kept, in hours
    #[serde(default = "default_retention_hours")]
    pub retention_hours: u64,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Directory for snapshots, the variable file and graphs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    /// Graph rendering settings
    #[serde(default)]
    pub graph: GraphConfig,

    /// Locations to poll, in output order
    #[serde(default)]
    pub locations: Vec<LocationConfig>,
}

/// Graph rendering settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_graph_width")]
    pub width: u32,
    #[serde(default = "default_graph_height")]
    pub height: u32,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            width: default_graph_width(),
            height: default_graph_height(),
        }
    }
}

/// One `[[locations]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Unique key, used in file names and variable names
    pub key: String,
    /// Display name
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// Sensor to prefer over the nearest one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor_id: Option<i64>,
    /// Graph line colour
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgba>,
}

impl LocationConfig {
    pub fn to_location(&self) -> Location {
        let location = Location::new(&self.key, &self.name, self.lat, self.lon);
        match self.sensor_id {
            Some(id) => location.with_sensor(id),
            None => location,
        }
    }

    /// Graph line colour, falling back to the palette entry for `index`.
    pub fn line_color(&self, index: usize) -> Rgba {
        self.color.unwrap_or(PALETTE[index % PALETTE.len()])
    }
}

fn default_endpoint() -> String {
    SensorCommunityClient::DEFAULT_ENDPOINT.to_string()
}

fn default_radius_km() -> f64 {
    airgauge_core::pipeline::DEFAULT_RADIUS_KM
}

fn default_retention_hours() -> u64 {
    24
}

fn default_timeout_secs() -> u64 {
    SensorCommunityClient::DEFAULT_TIMEOUT.as_secs()
}

fn default_true() -> bool {
    true
}

fn default_graph_width() -> u32 {
    450
}

fn default_graph_height() -> u32 {
    220
}

fn default_locations() -> Vec<LocationConfig> {
    vec![
        LocationConfig {
            key: "home".to_string(),
            name: "My Home".to_string(),
            lat: 40.0,
            lon: 44.5,
            sensor_id: Some(83131),
            color: Some(PALETTE[0]),
        },
        LocationConfig {
            key: "vanya".to_string(),
            name: "Vanya's Home".to_string(),
            lat: 40.2,
            lon: 44.5,
            sensor_id: Some(80868),
            color: Some(PALETTE[1]),
        },
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            radius_km: default_radius_km(),
            retention_hours: default_retention_hours(),
            timeout_secs: default_timeout_secs(),
            output_dir: None,
            graph: GraphConfig::default(),
            locations: default_locations(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("airgauge")
            .join("config.toml")
    }

    /// Load config from file, or return default if missing or unreadable
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::read(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{:#}; using default configuration", e);
                Self::default()
            }
        }
    }

    /// Read and parse config, failing on any error
    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// List every problem with this configuration. Empty means valid.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            problems.push(format!("endpoint must be an http(s) URL: {}", self.endpoint));
        }
        if !self.radius_km.is_finite() || self.radius_km <= 0.0 {
            problems.push(format!("radius_km must be positive: {}", self.radius_km));
        }
        if self.retention_hours == 0 {
            problems.push("retention_hours must be at least 1".to_string());
        }
        if self.timeout_secs == 0 {
            problems.push("timeout_secs must be at least 1".to_string());
        }
        if self.graph.enabled
            && (self.graph.width < MIN_GRAPH_WIDTH || self.graph.height < MIN_GRAPH_HEIGHT)
        {
            problems.push(format!(
                "graph size {}x{} is too small",
                self.graph.width, self.graph.height
            ));
        }
        if self.locations.is_empty() {
            problems.push("no locations configured".to_string());
        }

        let mut seen = HashSet::new();
        for loc in &self.locations {
            if loc.key.is_empty() {
                problems.push(format!("location '{}' has an empty key", loc.name));
            } else if !loc
                .key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            {
                problems.push(format!(
                    "location key '{}' may only contain letters, digits, '_' and '-'",
                    loc.key
                ));
            }
            if !seen.insert(loc.key.as_str()) {
                problems.push(format!("duplicate location key '{}'", loc.key));
            }
            if !(-90.0..=90.0).contains(&loc.lat) {
                problems.push(format!("location '{}': latitude {} out of range", loc.key, loc.lat));
            }
            if !(-180.0..=180.0).contains(&loc.lon) {
                problems.push(format!(
                    "location '{}': longitude {} out of range",
                    loc.key, loc.lon
                ));
            }
        }

        problems
    }

    /// Core locations, in configuration order.
    pub fn locations(&self) -> Vec<Location> {
        self.locations.iter().map(LocationConfig::to_location).collect()
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            radius_km: self.radius_km,
            retention: self.retention(),
        }
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_hours.saturating_mul(3600))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Output directory, falling back to the platform data directory.
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(airgauge_store::default_data_dir)
    }
}
