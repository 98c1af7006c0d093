//! File-backed persistent store.
//!
//! Each key is one pretty-printed JSON file (`{dir}/{key}.json`) replaced
//! atomically on every write.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{PillboxError, Result};
use crate::fs::write_atomic;
use crate::storage::traits::PersistentStore;

/// Persistent store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Use `dir` as the data directory. Nothing is created until the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(PillboxError::InvalidInput(format!(
                "Invalid storage key: {:?}",
                key
            )));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl PersistentStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(PillboxError::Persistence(format!(
                "Failed to read {}: {}",
                path.display(),
                err
            ))),
        }
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|e| {
            PillboxError::Persistence(format!(
                "Failed to create data directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;
        write_atomic(&path, value).map_err(|e| {
            PillboxError::Persistence(format!("Failed to write {}: {}", path.display(), e))
        })
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(PillboxError::Persistence(format!(
                "Failed to remove {}: {}",
                path.display(),
                err
            ))),
        }
    }
}
