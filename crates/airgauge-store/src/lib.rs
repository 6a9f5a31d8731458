//! Flat-file persistence for airgauge.
//!
//! This crate keeps the small amount of state a polling run carries from
//! one invocation to the next, as whole-file JSON snapshots in one
//! directory:
//!
//! - the rolling per-location AQI history
//! - the previous run's AQI per location, for trend computation
//!
//! It also owns the output files written next to them (widget variables
//! and graph images) so that every write goes through the same atomic
//! replace path.
//!
//! Runs are assumed not to overlap; there is no locking.
//!
//! # Example
//!
//! ```no_run
//! use airgauge_store::Store;
//!
//! let store = Store::open_default()?;
//! let history = store.load_history();
//! let state = store.load_state();
//! println!("{} history entries, {} locations", history.len(), state.locations.len());
//! # Ok::<(), airgauge_store::Error>(())
//! ```

mod error;
pub mod export;
pub mod snapshot;
mod store;

pub use error::{Error, Result};
pub use export::{HistoryRow, rows, to_csv};
pub use store::{HISTORY_FILE, STATE_FILE, Store, VARS_FILE};

/// Default data directory following platform conventions.
///
/// - Linux: `~/.local/share/airgauge`
/// - macOS: `~/Library/Application Support/airgauge`
/// - Windows: `C:\Users\<user>\AppData\Local\airgauge`
pub fn default_data_dir() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("airgauge")
}
