//! Flat JSON file persistence
//!
//! Every store reads its whole file, and every write replaces the whole
//! file. Concurrent writers race and the last write wins.

pub mod error;
pub mod phones;
pub mod pois;
pub mod drawings;
pub mod frames;

pub use error::{StorageError, StorageResult};
pub use phones::{PhoneRecord, PhoneStore};
pub use pois::{Poi, PoiStore};
pub use drawings::DrawingStore;
pub use frames::{FrameSlots, MAX_FRAME_SLOTS};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Read and parse a JSON file, `Ok(None)` when it does not exist
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> StorageResult<Option<T>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StorageError::io(path, e)),
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| StorageError::Corrupted {
            path: path.display().to_string(),
            message: e.to_string(),
        })
}

/// Replace a file with the JSON encoding of `value`
pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> StorageResult<()> {
    let content = serde_json::to_string_pretty(value).map_err(|e| StorageError::Serialization {
        message: e.to_string(),
    })?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
    }
    fs::write(path, content).map_err(|e| StorageError::io(path, e))
}
