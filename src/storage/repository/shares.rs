// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 GridShare Contributors

//! Share grant repository.
//!
//! A grant records that one user shared a file with another. Grants are
//! append-only: revocation is not part of the model, only deletion of the
//! underlying file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::{DataStore, StorageError, StorageResult};

/// User-to-user share grant stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredShare {
    /// Unique grant identifier (UUID)
    pub id: String,
    /// The shared file
    pub file_id: String,
    /// User who owns the file and created the grant
    pub owner_id: String,
    /// User the file was shared with
    pub recipient_id: String,
    /// When the grant was created
    pub shared_at: DateTime<Utc>,
}

/// Repository for share grant operations.
pub struct ShareRepository<'a> {
    store: &'a DataStore,
}

impl<'a> ShareRepository<'a> {
    pub fn new(store: &'a DataStore) -> Self {
        Self { store }
    }

    /// Create a new share grant.
    pub fn create(&self, share: &StoredShare) -> StorageResult<()> {
        if self.store.exists(self.store.paths().share(&share.id)) {
            return Err(StorageError::AlreadyExists(format!("Share {}", share.id)));
        }
        self.store
            .write_json(self.store.paths().share(&share.id), share)
    }

    /// List all grants where `recipient_id` is the recipient.
    pub fn list_for_recipient(&self, recipient_id: &str) -> StorageResult<Vec<StoredShare>> {
        let share_ids = self.store.list_ids(self.store.paths().shares_dir())?;

        let mut shares = Vec::new();
        for id in share_ids {
            if let Ok(share) = self
                .store
                .read_json::<StoredShare>(self.store.paths().share(&id))
            {
                if share.recipient_id == recipient_id {
                    shares.push(share);
                }
            }
        }

        Ok(shares)
    }

    /// Whether `recipient_id` has been granted access to `file_id`.
    pub fn grant_exists(&self, file_id: &str, recipient_id: &str) -> StorageResult<bool> {
        Ok(self
            .list_for_recipient(recipient_id)?
            .iter()
            .any(|share| share.file_id == file_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoragePaths;
    use std::env;
    use std::fs;

    fn test_store() -> DataStore {
        let test_dir = env::temp_dir().join(format!("gridshare-shares-{}", uuid::Uuid::new_v4()));
        let mut store = DataStore::new(StoragePaths::new(&test_dir));
        store.initialize().expect("Failed to initialize");
        store
    }

    fn cleanup(store: &DataStore) {
        let _ = fs::remove_dir_all(store.paths().root());
    }

    fn test_share(id: &str, file_id: &str, recipient: &str) -> StoredShare {
        StoredShare {
            id: id.to_string(),
            file_id: file_id.to_string(),
            owner_id: "u-owner".to_string(),
            recipient_id: recipient.to_string(),
            shared_at: Utc::now(),
        }
    }

    #[test]
    fn create_and_list_for_recipient() {
        let store = test_store();
        let repo = ShareRepository::new(&store);

        repo.create(&test_share("s-1", "f-1", "u-bob")).unwrap();
        repo.create(&test_share("s-2", "f-2", "u-bob")).unwrap();
        repo.create(&test_share("s-3", "f-3", "u-carol")).unwrap();

        let shares = repo.list_for_recipient("u-bob").unwrap();
        assert_eq!(shares.len(), 2);

        cleanup(&store);
    }

    #[test]
    fn grant_exists_checks_file_and_recipient() {
        let store = test_store();
        let repo = ShareRepository::new(&store);

        repo.create(&test_share("s-1", "f-1", "u-bob")).unwrap();

        assert!(repo.grant_exists("f-1", "u-bob").unwrap());
        assert!(!repo.grant_exists("f-1", "u-carol").unwrap());
        assert!(!repo.grant_exists("f-2", "u-bob").unwrap());

        cleanup(&store);
    }
}
