// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 GridShare Contributors

//! Encrypted file repository.
//!
//! File contents are encrypted by the crypto layer before they get here;
//! this repository only ever stores hex-encoded ciphertext and the IV it
//! was produced with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::{DataStore, StorageError, StorageResult};

/// Encrypted file record stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredFile {
    /// Unique file identifier (UUID)
    pub id: String,
    /// User who uploaded the file
    pub owner_id: String,
    /// Original filename, kept for the download attachment header
    pub filename: String,
    /// AES-256-CBC ciphertext, lowercase hex
    pub data: String,
    /// 16-byte initialization vector, lowercase hex
    pub iv: String,
    /// When the file was uploaded
    pub created_at: DateTime<Utc>,
}

/// Repository for encrypted file operations.
pub struct FileRepository<'a> {
    store: &'a DataStore,
}

impl<'a> FileRepository<'a> {
    pub fn new(store: &'a DataStore) -> Self {
        Self { store }
    }

    /// Check if a file record exists.
    pub fn exists(&self, file_id: &str) -> bool {
        self.store.exists(self.store.paths().file(file_id))
    }

    /// Get a file record by ID, regardless of owner.
    pub fn get(&self, file_id: &str) -> StorageResult<StoredFile> {
        let path = self.store.paths().file(file_id);
        if !self.store.exists(&path) {
            return Err(StorageError::NotFound(format!("File {file_id}")));
        }
        self.store.read_json(path)
    }

    /// Get a file record only if it is owned by `owner_id`.
    ///
    /// A file owned by someone else reads as NotFound so callers cannot
    /// distinguish "exists but not yours" from "does not exist".
    pub fn get_owned(&self, file_id: &str, owner_id: &str) -> StorageResult<StoredFile> {
        let file = self.get(file_id)?;
        if file.owner_id != owner_id {
            return Err(StorageError::NotFound(format!("File {file_id}")));
        }
        Ok(file)
    }

    /// Create a new file record.
    pub fn create(&self, file: &StoredFile) -> StorageResult<()> {
        if self.exists(&file.id) {
            return Err(StorageError::AlreadyExists(format!("File {}", file.id)));
        }
        self.store.write_json(self.store.paths().file(&file.id), file)
    }

    /// Delete a file record owned by `owner_id`.
    pub fn delete_owned(&self, file_id: &str, owner_id: &str) -> StorageResult<()> {
        self.get_owned(file_id, owner_id)?;
        self.store.delete(self.store.paths().file(file_id))
    }

    /// List all files owned by a user.
    pub fn list_by_owner(&self, owner_id: &str) -> StorageResult<Vec<StoredFile>> {
        let file_ids = self.store.list_ids(self.store.paths().files_dir())?;

        let mut files = Vec::new();
        for id in file_ids {
            if let Ok(file) = self.get(&id) {
                if file.owner_id == owner_id {
                    files.push(file);
                }
            }
        }

        Ok(files)
    }
}
