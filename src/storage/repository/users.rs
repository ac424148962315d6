// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 GridShare Contributors

//! User repository.
//!
//! A user record carries the grid geometry and the Argon2id hash of the
//! canonical pattern string. The raw pattern is consumed at signup to
//! compute the hash and never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::crypto::GridShape;

use super::super::{DataStore, StorageError, StorageResult};

/// User credential record stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    /// Unique user identifier (UUID)
    pub id: String,
    /// Display name
    pub username: String,
    /// Email address, unique across users
    pub email: String,
    /// Grid size the pattern was drawn on
    pub grid_size: u32,
    /// Grid layout the pattern was drawn on
    pub grid_shape: GridShape,
    /// Argon2id PHC hash of the canonical pattern string
    pub secret_hash: String,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Repository for user operations.
pub struct UserRepository<'a> {
    store: &'a DataStore,
}

impl<'a> UserRepository<'a> {
    pub fn new(store: &'a DataStore) -> Self {
        Self { store }
    }

    /// Check if a user exists.
    pub fn exists(&self, user_id: &str) -> bool {
        self.store.exists(self.store.paths().user(user_id))
    }

    /// Get a user by ID.
    pub fn get(&self, user_id: &str) -> StorageResult<StoredUser> {
        let path = self.store.paths().user(user_id);
        if !self.store.exists(&path) {
            return Err(StorageError::NotFound(format!("User {user_id}")));
        }
        self.store.read_json(path)
    }

    /// Get a user by email address.
    pub fn get_by_email(&self, email: &str) -> StorageResult<StoredUser> {
        let user_ids = self.store.list_ids(self.store.paths().users_dir())?;

        for id in user_ids {
            if let Ok(user) = self.get(&id) {
                if user.email == email {
                    return Ok(user);
                }
            }
        }

        Err(StorageError::NotFound(format!("User with email {email}")))
    }

    /// Create a new user. Fails if the id or email is already taken.
    pub fn create(&self, user: &StoredUser) -> StorageResult<()> {
        if self.exists(&user.id) {
            return Err(StorageError::AlreadyExists(format!("User {}", user.id)));
        }

        if self.get_by_email(&user.email).is_ok() {
            return Err(StorageError::AlreadyExists(format!(
                "User with email {}",
                user.email
            )));
        }

        self.store.write_json(self.store.paths().user(&user.id), user)
    }
}
