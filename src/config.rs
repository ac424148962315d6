// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 GridShare Contributors

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Root directory for persistent storage | `./data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `ENCRYPTION_KEY` | 32-byte key for file encryption at rest | dev key |
//! | `JWT_SECRET` | HS256 signing secret for session tokens | dev secret |
//! | `PUBLIC_BASE_URL` | Base URL embedded in generated one-time links | `http://localhost:8080` |
//! | `RUST_LOG` | Log level filter | `info` |
//!
//! The dev defaults for `ENCRYPTION_KEY` and `JWT_SECRET` exist so the
//! server starts in local development; production deployments must set
//! both. Rotating `ENCRYPTION_KEY` irrecoverably invalidates every file
//! encrypted under the previous key.

use std::env;
use std::path::PathBuf;

use thiserror::Error;

use crate::crypto::KEY_LEN;

/// Environment variable name for the data directory path.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Development fallback encryption key (32 ASCII bytes).
const DEV_ENCRYPTION_KEY: &str = "12345678901234567890123456789012";

/// Development fallback JWT secret.
const DEV_JWT_SECRET: &str = "supersecretkey";

/// Configuration error raised at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("ENCRYPTION_KEY must be exactly {KEY_LEN} bytes, got {0}")]
    BadKeyLength(usize),
    #[error("PORT is not a valid port number: {0}")]
    BadPort(String),
}

/// Process-wide configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory for persistent storage
    pub data_dir: PathBuf,
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Static key for file encryption at rest (exactly 32 bytes)
    pub encryption_key: Vec<u8>,
    /// HS256 signing secret for session tokens
    pub jwt_secret: String,
    /// Base URL prefixed to generated one-time links
    pub public_base_url: String,
}

impl Config {
    /// Load configuration from the environment, falling back to dev
    /// defaults where allowed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let data_dir = env::var(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(crate::storage::paths::DATA_ROOT));

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port_raw = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
        let port: u16 = port_raw
            .parse()
            .map_err(|_| ConfigError::BadPort(port_raw))?;

        let encryption_key = env::var("ENCRYPTION_KEY")
            .unwrap_or_else(|_| DEV_ENCRYPTION_KEY.to_string())
            .into_bytes();
        if encryption_key.len() != KEY_LEN {
            return Err(ConfigError::BadKeyLength(encryption_key.len()));
        }

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| DEV_JWT_SECRET.to_string());

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}"));

        Ok(Self {
            data_dir,
            host,
            port,
            encryption_key,
            jwt_secret,
            public_base_url,
        })
    }
}
