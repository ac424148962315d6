// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 GridShare Contributors

//! # Cryptography Module
//!
//! Two pure, stateless concerns live here:
//!
//! - `cipher` - AES-256-CBC encryption of file contents at rest
//! - `pattern` - canonical secret derivation and hashing for grid-pattern
//!   credentials (also reused for one-time link passwords)
//!
//! Both are safe under concurrent invocation; neither holds state beyond
//! the entropy they consume.

pub mod cipher;
pub mod pattern;

pub use cipher::{EncryptedPayload, FileCipher, IV_LEN, KEY_LEN};
pub use pattern::{canonical_secret, hash_secret, verify_secret, GridShape, PatternError};

use thiserror::Error;

/// Error type for cryptographic operations.
///
/// Decryption failures are deliberately coarse: malformed hex, a wrong key,
/// corrupted ciphertext, and padding-check failures all collapse into
/// [`CryptoError::DecryptionFailed`] so the caller can surface a single
/// user-facing "decryption failed" condition without leaking which check
/// tripped.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key material is not exactly [`KEY_LEN`] bytes.
    #[error("encryption key must be {KEY_LEN} bytes, got {0}")]
    InvalidKeyLength(usize),
    /// Ciphertext could not be decrypted (bad hex, wrong key, corruption,
    /// or padding failure).
    #[error("decryption failed")]
    DecryptionFailed,
    /// The password-hashing backend failed (e.g. salt generation).
    #[error("hashing failed: {0}")]
    HashingFailed(String),
}
