//! JSON document files
//!
//! `load_json` reports one of three outcomes so each store decides for
//! itself how to treat a file that exists but does not decode:
//!
//! - `Loaded(value)`: the file decoded as the expected shape
//! - `Empty`: the file is absent or contains only whitespace
//! - `Corrupt(details)`: the file has content that does not decode
//!
//! `write_json` writes to a temp file in the same directory, syncs it,
//! then renames it over the target so readers never see a partial file.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::error::{StorageError, StorageResult};

/// Result of reading a store file
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome<T> {
    Loaded(T),
    Empty,
    Corrupt(String),
}

impl<T> LoadOutcome<T> {
    /// Collapse to a value, treating both `Empty` and `Corrupt` as the default
    pub fn or_default(self) -> T
    where
        T: Default,
    {
        match self {
            LoadOutcome::Loaded(value) => value,
            LoadOutcome::Empty | LoadOutcome::Corrupt(_) => T::default(),
        }
    }
}

/// Read and decode a JSON file
pub fn load_json<T: DeserializeOwned>(path: &Path) -> StorageResult<LoadOutcome<T>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("{:?} not found, starting empty", path);
            return Ok(LoadOutcome::Empty);
        }
        Err(e) => return Err(StorageError::from_read(e, path.to_path_buf())),
    };

    if content.trim().is_empty() {
        return Ok(LoadOutcome::Empty);
    }

    match serde_json::from_str(&content) {
        Ok(value) => Ok(LoadOutcome::Loaded(value)),
        Err(e) => Ok(LoadOutcome::Corrupt(e.to_string())),
    }
}

/// Encode `value` as pretty-printed JSON and atomically replace `path`
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> StorageResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|source| StorageError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    atomic_write(path, json.as_bytes())
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let temp_path = path.with_extension("json.tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_io(e, temp_path.clone()))?;
    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;
    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|source| StorageError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source,
    })?;

    debug!("wrote {} bytes to {:?}", data.len(), path);
    Ok(())
}
