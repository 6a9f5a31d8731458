//! Command-line interface for airgauge.
//!
//! `airgauge` polls the Sensor.Community network around each configured
//! location, derives the US EPA style Air Quality Index from PM2.5 and PM10
//! and writes the files a desktop widget (such as a Rainmeter skin) reads.
//! It is a single-shot batch tool meant to be invoked by a scheduler.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `run` | Poll all locations once and write widget files (default) |
//! | `history` | Print the stored AQI history |
//! | `config` | Show, create or validate the configuration file |
//! | `completions` | Generate shell completions |
//!
//! # Files
//!
//! Everything is written to the output directory (`output_dir` in the
//! config, default `~/.local/share/airgauge` or platform equivalent):
//!
//! - `aqi_data.inc`: `[Variables]` block with one set of variables per location
//! - `aqi_graph_<key>.png`: AQI over the retention window
//! - `aqi_history.json`, `aqi_last.json`: state carried between runs
//!
//! # Configuration
//!
//! The configuration lives in `~/.config/airgauge/config.toml` (or platform
//! equivalent). Override it with `--config <path>` or `AIRGAUGE_CONFIG`.
//!
//! ```toml
//! radius_km = 2.0
//! retention_hours = 24
//!
//! [graph]
//! width = 450
//! height = 220
//!
//! [[locations]]
//! key = "home"
//! name = "My Home"
//! lat = 40.0
//! lon = 44.5
//! sensor_id = 83131
//! color = "#00ff80"
//! ```
//!
//! # Examples
//!
//! ```bash
//! airgauge                       # one pass, default config
//! airgauge run --dry-run --json  # compute only, print the report
//! airgauge history --location home --format csv --output home.csv
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod output;
pub mod util;

pub use airgauge_core;
pub use airgauge_types;
