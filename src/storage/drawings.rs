//! Map drawings, stored as an opaque JSON document

use crate::storage::{read_json, write_json, StorageResult};
use serde_json::Value;
use std::path::{Path, PathBuf};

pub const DRAWINGS_FILE: &str = "drawings.json";

#[derive(Debug, Clone)]
pub struct DrawingStore {
    path: PathBuf,
}

impl DrawingStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(DRAWINGS_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the stored drawings with `drawings`
    pub fn save(&self, drawings: &Value) -> StorageResult<()> {
        write_json(&self.path, drawings)
    }

    /// Stored drawings, or an empty array when nothing was saved yet
    pub fn load(&self) -> StorageResult<Value> {
        Ok(read_json(&self.path)?.unwrap_or_else(|| Value::Array(Vec::new())))
    }
}
