// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 GridShare Contributors

//! Filesystem-backed JSON store.
//!
//! Each entity is one JSON file under the data directory. Writes go
//! through a temp file and an atomic rename so a crash mid-write never
//! leaves a half-written record. File *contents* are encrypted by the
//! crypto layer before they reach this module; the store itself only ever
//! sees ciphertext in the `data` field of a file record.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use super::StoragePaths;

/// Error type for storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error during file operations
    Io(io::Error),
    /// JSON serialization/deserialization error
    Json(serde_json::Error),
    /// Entity not found
    NotFound(String),
    /// Entity already exists
    AlreadyExists(String),
    /// Storage not initialized
    NotInitialized,
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "I/O error: {e}"),
            StorageError::Json(e) => write!(f, "JSON error: {e}"),
            StorageError::NotFound(entity) => write!(f, "Not found: {entity}"),
            StorageError::AlreadyExists(entity) => write!(f, "Already exists: {entity}"),
            StorageError::NotInitialized => write!(f, "Storage not initialized"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            StorageError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for StorageError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::NotFound {
            StorageError::NotFound(e.to_string())
        } else {
            StorageError::Io(e)
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Json(e)
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// JSON-file store for user, file, and share records.
#[derive(Debug, Clone)]
pub struct DataStore {
    paths: StoragePaths,
    initialized: bool,
}

impl DataStore {
    /// Create a new DataStore instance.
    ///
    /// Does NOT create the directory structure. Call `initialize()` first.
    pub fn new(paths: StoragePaths) -> Self {
        Self {
            paths,
            initialized: false,
        }
    }

    /// Get the storage paths.
    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    /// Create the directory structure. Idempotent.
    pub fn initialize(&mut self) -> StorageResult<()> {
        let dirs = [
            self.paths.users_dir(),
            self.paths.files_dir(),
            self.paths.shares_dir(),
        ];

        for dir in dirs {
            fs::create_dir_all(&dir)?;
        }

        self.initialized = true;
        Ok(())
    }

    /// Read a JSON file and deserialize it.
    pub fn read_json<T: DeserializeOwned>(&self, path: impl AsRef<Path>) -> StorageResult<T> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        let value = serde_json::from_reader(reader)?;
        Ok(value)
    }

    /// Write a JSON file (atomic write via rename).
    pub fn write_json<T: Serialize>(&self, path: impl AsRef<Path>, value: &T) -> StorageResult<()> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("tmp");
        {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()?;
        }

        fs::rename(&temp_path, path)?;
        Ok(())
    }

    /// Check if a file exists.
    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        path.as_ref().is_file()
    }

    /// Delete a file.
    pub fn delete(&self, path: impl AsRef<Path>) -> StorageResult<()> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }
        fs::remove_file(path.as_ref())?;
        Ok(())
    }

    /// List the ids (file stems) of all entities in a directory.
    pub fn list_ids(&self, dir: impl AsRef<Path>) -> StorageResult<Vec<String>> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                if let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) {
                    ids.push(id.to_string());
                }
            }
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::env;

    pub(crate) fn test_store() -> DataStore {
        let test_dir = env::temp_dir().join(format!("gridshare-store-{}", uuid::Uuid::new_v4()));
        let mut store = DataStore::new(StoragePaths::new(&test_dir));
        store.initialize().expect("Failed to initialize test store");
        store
    }

    fn cleanup(store: &DataStore) {
        let _ = fs::remove_dir_all(store.paths().root());
    }

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct TestData {
        id: String,
        value: i32,
    }

    #[test]
    fn initialize_creates_directories() {
        let store = test_store();

        assert!(store.paths().users_dir().exists());
        assert!(store.paths().files_dir().exists());
        assert!(store.paths().shares_dir().exists());

        cleanup(&store);
    }

    #[test]
    fn write_and_read_json() {
        let store = test_store();
        let data = TestData {
            id: "test-1".to_string(),
            value: 42,
        };

        let path = store.paths().users_dir().join("test.json");
        store.write_json(&path, &data).unwrap();

        let read: TestData = store.read_json(&path).unwrap();
        assert_eq!(read, data);

        cleanup(&store);
    }

    #[test]
    fn delete_file_removes_it() {
        let store = test_store();

        let path = store.paths().files_dir().join("to-delete.json");
        store
            .write_json(&path, &TestData {
                id: "del".to_string(),
                value: 0,
            })
            .unwrap();

        assert!(store.exists(&path));
        store.delete(&path).unwrap();
        assert!(!store.exists(&path));

        cleanup(&store);
    }

    #[test]
    fn list_ids_returns_stems() {
        let store = test_store();

        for i in 1..=3 {
            let path = store.paths().shares_dir().join(format!("share-{i}.json"));
            store
                .write_json(&path, &TestData {
                    id: format!("share-{i}"),
                    value: i,
                })
                .unwrap();
        }

        let ids = store.list_ids(store.paths().shares_dir()).unwrap();
        assert_eq!(ids.len(), 3);
        assert!(ids.contains(&"share-1".to_string()));

        cleanup(&store);
    }

    #[test]
    fn uninitialized_store_returns_error() {
        let store = DataStore::new(StoragePaths::new("/tmp/never-init"));

        let result = store.read_json::<TestData>("/tmp/any.json");
        assert!(matches!(result, Err(StorageError::NotInitialized)));
    }
}
