// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 GridShare Contributors

//! File encryption at rest.
//!
//! Files are encrypted with AES-256-CBC and PKCS#7 padding. Every call to
//! [`FileCipher::encrypt`] draws a fresh random 16-byte IV, so encrypting
//! the same plaintext twice never yields the same ciphertext. Ciphertext
//! and IV are stored as lowercase hex strings alongside the file record.
//!
//! ## Key management
//!
//! A single process-wide key is sourced from configuration. Rotating that
//! key invalidates every previously encrypted file irrecoverably; there is
//! no key wrapping or per-file key derivation.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::{rngs::OsRng, RngCore};

use super::CryptoError;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Required key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// IV length in bytes (AES block size).
pub const IV_LEN: usize = 16;

/// Result of encrypting a file: hex-encoded ciphertext plus the hex-encoded
/// IV needed to decrypt it again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedPayload {
    pub ciphertext_hex: String,
    pub iv_hex: String,
}

/// Symmetric cipher bound to the process-wide encryption key.
#[derive(Clone)]
pub struct FileCipher {
    key: Vec<u8>,
}

impl FileCipher {
    /// Create a cipher from raw key material. Fails unless the key is
    /// exactly [`KEY_LEN`] bytes.
    pub fn new(key: impl Into<Vec<u8>>) -> Result<Self, CryptoError> {
        let key = key.into();
        if key.len() != KEY_LEN {
            return Err(CryptoError::InvalidKeyLength(key.len()));
        }
        Ok(Self { key })
    }

    /// Encrypt a plaintext buffer under a freshly generated random IV.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<EncryptedPayload, CryptoError> {
        let mut iv = [0u8; IV_LEN];
        OsRng.fill_bytes(&mut iv);

        let enc = Aes256CbcEnc::new_from_slices(&self.key, &iv)
            .map_err(|_| CryptoError::InvalidKeyLength(self.key.len()))?;
        let ciphertext = enc.encrypt_padded_vec_mut::<Pkcs7>(plaintext);

        Ok(EncryptedPayload {
            ciphertext_hex: hex::encode(ciphertext),
            iv_hex: hex::encode(iv),
        })
    }

    /// Decrypt hex-encoded ciphertext with its hex-encoded IV.
    ///
    /// Any failure (malformed hex, wrong IV length, corrupted ciphertext,
    /// padding mismatch) surfaces as [`CryptoError::DecryptionFailed`].
    pub fn decrypt(&self, ciphertext_hex: &str, iv_hex: &str) -> Result<Vec<u8>, CryptoError> {
        let ciphertext = hex::decode(ciphertext_hex).map_err(|_| CryptoError::DecryptionFailed)?;
        let iv = hex::decode(iv_hex).map_err(|_| CryptoError::DecryptionFailed)?;
        if iv.len() != IV_LEN {
            return Err(CryptoError::DecryptionFailed);
        }

        let dec = Aes256CbcDec::new_from_slices(&self.key, &iv)
            .map_err(|_| CryptoError::DecryptionFailed)?;
        dec.decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .map_err(|_| CryptoError::DecryptionFailed)
    }
}

impl std::fmt::Debug for FileCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material
        f.debug_struct("FileCipher").finish_non_exhaustive()
    }
}
