// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 GridShare Contributors

use std::sync::Arc;

use crate::config::Config;
use crate::crypto::FileCipher;
use crate::links::LinkRegistry;
use crate::storage::DataStore;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// JSON-file store for users, files, and shares
    pub storage: DataStore,
    /// In-process one-time link table
    pub links: Arc<LinkRegistry>,
    /// Cipher bound to the process-wide encryption key
    pub cipher: FileCipher,
    /// Runtime configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Build state from an initialized store and loaded configuration.
    ///
    /// Panics only if the configured encryption key has the wrong length,
    /// which `Config::from_env` already rejects.
    pub fn new(storage: DataStore, config: Config) -> Self {
        let cipher = FileCipher::new(config.encryption_key.clone())
            .expect("Config::from_env validates the encryption key length");
        Self {
            storage,
            links: Arc::new(LinkRegistry::new()),
            cipher,
            config: Arc::new(config),
        }
    }
}
