// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 GridShare Contributors

//! Repository layer providing typed access to the JSON store.
//!
//! Each repository provides CRUD operations for a specific entity type,
//! using the DataStore for all file operations.

pub mod files;
pub mod shares;
pub mod users;

pub use files::{FileRepository, StoredFile};
pub use shares::{ShareRepository, StoredShare};
pub use users::{StoredUser, UserRepository};
