//! Whole-file JSON snapshots.
//!
//! A snapshot is read in full at the start of a run and rewritten in full
//! at the end. Writes go to a sibling temporary file which is then renamed
//! over the target, so a crash mid-write leaves the old snapshot intact.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Load a snapshot, falling back to `T::default()` if it is missing,
/// unreadable or not valid JSON for `T`.
pub fn load_or_default<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No snapshot at {}, starting empty", path.display());
            return T::default();
        }
        Err(e) => {
            warn!("Cannot read {}: {}; starting empty", path.display(), e);
            return T::default();
        }
    };

    match serde_json::from_str(&contents) {
        Ok(value) => value,
        Err(e) => {
            warn!("Ignoring corrupt snapshot {}: {}", path.display(), e);
            T::default()
        }
    }
}

/// Serialize `value` as JSON and write it atomically to `path`.
pub fn save<T>(path: &Path, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let json = serde_json::to_string(value)?;
    write_atomic(path, json.as_bytes())
}

/// Write `contents` to `path` via a temporary file and rename.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty())
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let tmp = temp_path(path);
    fs::write(&tmp, contents).map_err(|e| Error::Write {
        path: tmp.clone(),
        source: e,
    })?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        Error::Write {
            path: path.to_path_buf(),
            source: e,
        }
    })?;
    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
