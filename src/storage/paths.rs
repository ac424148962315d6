// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 GridShare Contributors

//! Path constants and utilities for the data directory layout.

use std::path::{Path, PathBuf};

/// Default base directory for persistent storage.
pub const DATA_ROOT: &str = "./data";

/// Storage path utilities for the data directory.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DATA_ROOT)
    }
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all persistent data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory containing all user records.
    pub fn users_dir(&self) -> PathBuf {
        self.root.join("users")
    }

    /// Path to a specific user record.
    pub fn user(&self, user_id: &str) -> PathBuf {
        self.users_dir().join(format!("{user_id}.json"))
    }

    /// Directory containing all encrypted file records.
    pub fn files_dir(&self) -> PathBuf {
        self.root.join("files")
    }

    /// Path to a specific encrypted file record.
    pub fn file(&self, file_id: &str) -> PathBuf {
        self.files_dir().join(format!("{file_id}.json"))
    }

    /// Directory containing all share grants.
    pub fn shares_dir(&self) -> PathBuf {
        self.root.join("shares")
    }

    /// Path to a specific share grant.
    pub fn share(&self, share_id: &str) -> PathBuf {
        self.shares_dir().join(format!("{share_id}.json"))
    }
}
