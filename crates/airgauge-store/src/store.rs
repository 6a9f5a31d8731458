//! Main store implementation.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use airgauge_types::{History, PreviousState};

use crate::error::{Error, Result};
use crate::snapshot;

/// File name of the rolling history snapshot.
pub const HISTORY_FILE: &str = "aqi_history.json";
/// File name of the previous-run state snapshot.
pub const STATE_FILE: &str = "aqi_last.json";
/// File name of the widget variable file.
pub const VARS_FILE: &str = "aqi_data.inc";

/// Directory holding every file a run reads or writes.
///
/// ```text
/// <dir>/
///   aqi_history.json      rolling per-location history
///   aqi_last.json         previous run's AQI per location
///   aqi_data.inc          widget variables
///   aqi_graph_<key>.png   one graph per location
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| Error::CreateDirectory {
                path: dir.clone(),
                source: e,
            })?;
            info!("Created data directory {}", dir.display());
        }
        debug!("Using data directory {}", dir.display());
        Ok(Self { dir })
    }

    /// Refer to `dir` without touching the filesystem.
    ///
    /// Loads from a missing directory return empty defaults; writes create
    /// the directory on demand.
    pub fn at<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Open the default data directory.
    pub fn open_default() -> Result<Self> {
        Self::open(crate::default_data_dir())
    }

    /// The store's root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn history_path(&self) -> PathBuf {
        self.dir.join(HISTORY_FILE)
    }

    pub fn state_path(&self) -> PathBuf {
        self.dir.join(STATE_FILE)
    }

    pub fn vars_path(&self) -> PathBuf {
        self.dir.join(VARS_FILE)
    }

    /// Path of the graph image for a location.
    pub fn graph_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("aqi_graph_{key}.png"))
    }

    // === Snapshots ===

    /// Load the history, or an empty one if missing or corrupt.
    pub fn load_history(&self) -> History {
        snapshot::load_or_default(&self.history_path())
    }

    /// Replace the history snapshot.
    pub fn save_history(&self, history: &History) -> Result<()> {
        snapshot::save(&self.history_path(), history)
    }

    /// Load the previous-run state, or an empty one if missing or corrupt.
    pub fn load_state(&self) -> PreviousState {
        snapshot::load_or_default(&self.state_path())
    }

    /// Replace the previous-run state snapshot.
    pub fn save_state(&self, state: &PreviousState) -> Result<()> {
        snapshot::save(&self.state_path(), state)
    }

    // === Outputs ===

    /// Atomically replace the widget variable file.
    pub fn write_vars(&self, contents: &str) -> Result<PathBuf> {
        let path = self.vars_path();
        snapshot::write_atomic(&path, contents.as_bytes())?;
        Ok(path)
    }

    /// Atomically replace the graph image for a location.
    pub fn write_graph(&self, key: &str, png: &[u8]) -> Result<PathBuf> {
        let path = self.graph_path(key);
        snapshot::write_atomic(&path, png)?;
        Ok(path)
    }
}
