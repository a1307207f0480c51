//! Points of interest

use crate::storage::{read_json, write_json, StorageError, StorageResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

pub const POIS_FILE: &str = "pois.json";

/// A point of interest: an id plus whatever fields the map client attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Poi {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }
}

/// Ordered list of points of interest, persisted in `pois.json`
#[derive(Debug, Clone)]
pub struct PoiStore {
    path: PathBuf,
}

impl PoiStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(POIS_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All points; a missing or unreadable file yields an empty list
    pub fn load(&self) -> Vec<Poi> {
        read_json(&self.path).ok().flatten().unwrap_or_default()
    }

    /// Insert or replace by id. Replacement keeps the point's position in the list.
    pub fn save(&self, poi: Poi) -> StorageResult<()> {
        let mut pois = self.load();
        match pois.iter_mut().find(|existing| existing.id == poi.id) {
            Some(existing) => *existing = poi,
            None => pois.push(poi),
        }
        write_json(&self.path, &pois)
    }

    /// Remove every point with `id`; returns whether anything was removed
    pub fn delete(&self, id: &str) -> StorageResult<bool> {
        let mut pois: Vec<Poi> = read_json(&self.path)?.ok_or_else(|| StorageError::NotFound {
            path: self.path.display().to_string(),
        })?;

        let before = pois.len();
        pois.retain(|poi| poi.id != id);
        write_json(&self.path, &pois)?;
        Ok(pois.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_support::temp_dir;
    use serde_json::json;
    use std::fs;

    #[test]
    fn test_upsert_keeps_order() {
        let dir = temp_dir("pois-upsert");
        let store = PoiStore::new(&dir);
        assert!(store.load().is_empty());

        store.save(Poi::new("a").with_field("name", json!("Camp"))).unwrap();
        store.save(Poi::new("b").with_field("name", json!("Well"))).unwrap();
        store.save(Poi::new("a").with_field("name", json!("Base"))).unwrap();

        let pois = store.load();
        assert_eq!(pois.len(), 2);
        assert_eq!(pois[0].id, "a");
        assert_eq!(pois[0].fields["name"], json!("Base"));
        assert_eq!(pois[1].id, "b");
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_extra_fields_survive() {
        let dir = temp_dir("pois-fields");
        let store = PoiStore::new(&dir);
        fs::write(
            store.path(),
            r#"[{"id": "x", "lat": 1.5, "lng": 2.5, "tags": ["water"]}]"#,
        )
        .unwrap();

        let pois = store.load();
        assert_eq!(pois[0].fields["tags"], json!(["water"]));

        store.save(Poi::new("y")).unwrap();
        let raw: Value = serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw[0]["lat"], json!(1.5));
        assert_eq!(raw[1]["id"], json!("y"));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_corrupt_file_is_empty_for_save() {
        let dir = temp_dir("pois-corrupt");
        let store = PoiStore::new(&dir);
        fs::write(store.path(), "not json").unwrap();

        assert!(store.load().is_empty());
        assert!(matches!(store.delete("a"), Err(StorageError::Corrupted { .. })));

        store.save(Poi::new("a")).unwrap();
        assert_eq!(store.load().len(), 1);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_delete() {
        let dir = temp_dir("pois-delete");
        let store = PoiStore::new(&dir);
        assert!(matches!(store.delete("a"), Err(StorageError::NotFound { .. })));

        store.save(Poi::new("a")).unwrap();
        store.save(Poi::new("b")).unwrap();
        assert!(store.delete("a").unwrap());
        assert!(!store.delete("a").unwrap());

        let ids: Vec<String> = store.load().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["b".to_string()]);
        fs::remove_dir_all(dir).unwrap();
    }
}
