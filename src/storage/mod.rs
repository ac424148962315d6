// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 GridShare Contributors

//! # Storage Module
//!
//! Persistent storage for user, file, and share records: one JSON file per
//! entity under the data directory, with atomic temp-file-then-rename
//! writes.
//!
//! ## Storage Layout
//!
//! ```text
//! data/
//!   users/{user_id}.json    # credential record (pattern hash, never the pattern)
//!   files/{file_id}.json    # encrypted file record (hex ciphertext + IV)
//!   shares/{share_id}.json  # user-to-user share grants
//! ```
//!
//! One-time link entries deliberately live in memory only (see the `links`
//! module) and never touch this layer.

pub mod paths;
pub mod repository;
pub mod store;

pub use paths::StoragePaths;
pub use repository::{
    FileRepository, ShareRepository, StoredFile, StoredShare, StoredUser, UserRepository,
};
pub use store::{DataStore, StorageError, StorageResult};
