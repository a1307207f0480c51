//! Latest known state of every reporting device

use crate::api::types::LocationUpdate;
use crate::storage::{read_json, write_json, StorageError, StorageResult};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const PHONES_FILE: &str = "phones.json";

/// Stored position of one device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoneRecord {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

impl From<&LocationUpdate> for PhoneRecord {
    fn from(update: &LocationUpdate) -> Self {
        Self {
            lat: update.lat,
            lng: update.lng,
            heading: update.heading,
            accuracy: update.accuracy,
        }
    }
}

/// Device records keyed by id, persisted in `phones.json`
#[derive(Debug, Clone)]
pub struct PhoneStore {
    path: PathBuf,
}

impl PhoneStore {
    /// Create a store for `phones.json` inside `data_dir`
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(PHONES_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every record; an absent file is an empty map
    pub fn load_all(&self) -> StorageResult<BTreeMap<String, PhoneRecord>> {
        Ok(read_json(&self.path)?.unwrap_or_default())
    }

    /// Replace the whole file
    pub fn save_all(&self, phones: &BTreeMap<String, PhoneRecord>) -> StorageResult<()> {
        write_json(&self.path, phones)
    }

    /// Store one device's position, replacing its previous record
    pub fn update_location(&self, update: &LocationUpdate) -> StorageResult<()> {
        if update.id.is_empty() {
            return Err(StorageError::MissingData { field: "id" });
        }
        if !update.lat.is_finite() {
            return Err(StorageError::MissingData { field: "lat" });
        }
        if !update.lng.is_finite() {
            return Err(StorageError::MissingData { field: "lng" });
        }

        let mut phones = self.load_all()?;
        phones.insert(update.id.clone(), PhoneRecord::from(update));
        self.save_all(&phones)?;
        debug!("Stored location for {} ({} devices)", update.id, phones.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_support::temp_dir;
    use std::fs;

    fn update(id: &str, lat: f64, lng: f64) -> LocationUpdate {
        LocationUpdate {
            id: id.to_string(),
            lat,
            lng,
            heading: None,
            accuracy: None,
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = temp_dir("phones-empty");
        let store = PhoneStore::new(&dir);
        assert!(store.load_all().unwrap().is_empty());
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_update_replaces_one_entry() {
        let dir = temp_dir("phones-update");
        let store = PhoneStore::new(&dir);

        store.update_location(&update("nota", 1.0, 2.0)).unwrap();
        store.update_location(&update("tab", 5.0, 6.0)).unwrap();
        let mut moved = update("nota", 1.5, 2.5);
        moved.heading = Some(270.0);
        store.update_location(&moved).unwrap();

        let phones = store.load_all().unwrap();
        assert_eq!(phones.len(), 2);
        assert_eq!(phones["nota"].lat, 1.5);
        assert_eq!(phones["nota"].heading, Some(270.0));
        assert_eq!(phones["tab"].lng, 6.0);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_missing_data() {
        let dir = temp_dir("phones-missing");
        let store = PhoneStore::new(&dir);

        assert_eq!(
            store.update_location(&update("", 1.0, 2.0)),
            Err(StorageError::MissingData { field: "id" })
        );
        assert_eq!(
            store.update_location(&update("nota", f64::NAN, 2.0)),
            Err(StorageError::MissingData { field: "lat" })
        );
        assert!(!store.path().exists());
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_reads_plain_records() {
        let dir = temp_dir("phones-plain");
        let store = PhoneStore::new(&dir);
        fs::write(store.path(), r#"{"nota": {"lat": 1.0, "lng": 2.0}}"#).unwrap();

        let phones = store.load_all().unwrap();
        assert_eq!(phones["nota"].heading, None);

        fs::write(store.path(), "{").unwrap();
        assert!(matches!(store.load_all(), Err(StorageError::Corrupted { .. })));
        fs::remove_dir_all(dir).unwrap();
    }
}
