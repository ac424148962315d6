// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 GridShare Contributors

//! # One-Time Link Registry
//!
//! Issues opaque redemption tokens for password-protected, time-limited,
//! single-use file downloads, and mediates every redemption attempt.
//!
//! Per-token state machine: `ISSUED -> {REDEEMED, REVOKED, EXPIRED}`, all
//! terminal. An entry is removed on successful redemption, when the attempt
//! cap is reached, or when expiry is observed.
//!
//! ## Concurrency
//!
//! All mutation goes through one lock over the token table, so redemption
//! is an atomic compare-and-delete: two concurrent attempts against the
//! same token can never both succeed. The file fetch and decryption for a
//! winning attempt happen inside the critical section; that is acceptable
//! here because redemption is rare and the files are small.
//!
//! ## Operational property
//!
//! Entries live only for the process lifetime. A restart silently revokes
//! every outstanding link. This is a deliberate simplification for a
//! single-process deployment; a multi-node deployment would need an
//! external store with TTL and conditional delete.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, RngCore};
use thiserror::Error;

use crate::crypto::{self, CryptoError};

/// Fixed validity window for an issued link.
pub const LINK_TTL_MINUTES: i64 = 10;

/// Failed password attempts before a link is revoked.
pub const MAX_ATTEMPTS: u32 = 3;

/// Random bytes in a redemption token (hex-encoded on the wire).
pub const TOKEN_BYTES: usize = 32;

/// How many leading characters of a token are safe to log.
const TOKEN_LOG_PREFIX: usize = 8;

/// File metadata returned by the issue-time ownership lookup.
#[derive(Debug, Clone)]
pub struct FileRef {
    pub id: String,
    pub filename: String,
}

/// Error issuing or redeeming a link.
#[derive(Debug, Error)]
pub enum LinkError {
    /// The referenced file does not exist or is not owned by the caller.
    /// Collapsed into one variant so responses cannot reveal which.
    #[error("file not found or unauthorized")]
    NotFoundOrUnauthorized,
    /// A freshly generated token already exists in the table. With 256-bit
    /// tokens this is effectively unreachable, but the registry fails
    /// closed rather than overwriting a live entry.
    #[error("token collision")]
    TokenCollision,
    /// Hashing or decryption failed. The entry is not consumed.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// Outcome of a redemption attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum Redemption {
    /// No password supplied; the entry is untouched so a client can probe
    /// for the password-entry UI without spending an attempt.
    PasswordPrompt,
    /// Correct password; the entry has been deleted.
    Success { filename: String, bytes: Vec<u8> },
    /// Wrong password; the entry survives with one more attempt recorded.
    InvalidPassword { attempts_remaining: u32 },
    /// Wrong password for the final time; the entry has been deleted.
    Revoked,
    /// Unknown or expired token.
    NotFound,
    /// The referenced file record disappeared; the entry has been deleted.
    FileGone,
}

#[derive(Debug)]
struct LinkEntry {
    file_id: String,
    password_hash: String,
    /// Denormalized so redemption does not need a file lookup for the name.
    filename: String,
    expires_at: DateTime<Utc>,
    attempts: u32,
    #[allow(dead_code)]
    owner_id: String,
}

/// In-process table of outstanding one-time links.
#[derive(Debug)]
pub struct LinkRegistry {
    entries: Mutex<HashMap<String, LinkEntry>>,
    ttl: Duration,
    max_attempts: u32,
}

impl Default for LinkRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkRegistry {
    /// Registry with production policy: 10-minute TTL, 3 attempts.
    pub fn new() -> Self {
        Self::with_policy(Duration::minutes(LINK_TTL_MINUTES), MAX_ATTEMPTS)
    }

    /// Registry with custom policy (tests use this to exercise expiry).
    pub fn with_policy(ttl: Duration, max_attempts: u32) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            max_attempts,
        }
    }

    /// Issue a token for `file_id` on behalf of `owner_id`.
    ///
    /// `lookup` must return the file only if it exists and is owned by
    /// `owner_id`; otherwise issuance fails without revealing which check
    /// failed. The supplied password is hashed with the same scheme as
    /// credentials before storage.
    ///
    /// The returned token is a bearer secret. It belongs in the generated
    /// link and nowhere else; logs carry only a short prefix.
    pub fn issue<F>(
        &self,
        file_id: &str,
        password: &str,
        owner_id: &str,
        lookup: F,
    ) -> Result<String, LinkError>
    where
        F: FnOnce(&str, &str) -> Option<FileRef>,
    {
        let file = lookup(file_id, owner_id).ok_or(LinkError::NotFoundOrUnauthorized)?;
        let password_hash = crypto::hash_secret(password)?;

        let mut token_bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut token_bytes);
        let token = hex::encode(token_bytes);

        let mut entries = self.lock();
        if entries.contains_key(&token) {
            return Err(LinkError::TokenCollision);
        }
        entries.insert(
            token.clone(),
            LinkEntry {
                file_id: file.id,
                password_hash,
                filename: file.filename,
                expires_at: Utc::now() + self.ttl,
                attempts: 0,
                owner_id: owner_id.to_string(),
            },
        );

        tracing::info!(
            token_prefix = &token[..TOKEN_LOG_PREFIX],
            file_id,
            "one-time link issued"
        );
        Ok(token)
    }

    /// Attempt to redeem `token`.
    ///
    /// `fetch` resolves the referenced file to its decrypted contents:
    /// `None` means the file record is gone, `Some(Err(_))` means
    /// decryption failed (the entry is kept so the owner can investigate),
    /// `Some(Ok(bytes))` completes the redemption and consumes the entry.
    pub fn redeem<F>(
        &self,
        token: &str,
        password: Option<&str>,
        fetch: F,
    ) -> Result<Redemption, LinkError>
    where
        F: FnOnce(&str) -> Option<Result<Vec<u8>, CryptoError>>,
    {
        let mut entries = self.lock();

        // Expiry is checked before anything else so an expired token is
        // indistinguishable from an unknown one and never costs an attempt.
        if let Some(entry) = entries.get(token) {
            if Utc::now() > entry.expires_at {
                entries.remove(token);
                tracing::info!(
                    token_prefix = token_prefix(token),
                    "expired one-time link evicted"
                );
                return Ok(Redemption::NotFound);
            }
        }

        let Some(entry) = entries.get_mut(token) else {
            return Ok(Redemption::NotFound);
        };

        let Some(password) = password else {
            return Ok(Redemption::PasswordPrompt);
        };

        if !crypto::verify_secret(password, &entry.password_hash) {
            entry.attempts += 1;
            if entry.attempts >= self.max_attempts {
                entries.remove(token);
                tracing::warn!(
                    token_prefix = token_prefix(token),
                    "one-time link revoked after too many failed attempts"
                );
                return Ok(Redemption::Revoked);
            }
            let attempts_remaining = self.max_attempts - entry.attempts;
            return Ok(Redemption::InvalidPassword { attempts_remaining });
        }

        match fetch(&entry.file_id) {
            None => {
                entries.remove(token);
                Ok(Redemption::FileGone)
            }
            Some(Err(e)) => {
                tracing::warn!(
                    token_prefix = token_prefix(token),
                    error = %e,
                    "decryption failed during link redemption"
                );
                Err(LinkError::Crypto(e))
            }
            Some(Ok(bytes)) => {
                let filename = entry.filename.clone();
                entries.remove(token);
                tracing::info!(
                    token_prefix = token_prefix(token),
                    "one-time link redeemed"
                );
                Ok(Redemption::Success { filename, bytes })
            }
        }
    }

    /// Evict all expired entries; returns how many were removed.
    ///
    /// Lazy eviction in [`redeem`](Self::redeem) already guarantees an
    /// expired token is never redeemable; the periodic sweep just keeps the
    /// table from accumulating dead entries.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at >= now);
        before - entries.len()
    }

    /// Number of outstanding links (expired-but-unswept included).
    pub fn outstanding(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, LinkEntry>> {
        // A poisoned lock only means another thread panicked mid-mutation
        // of its own entry; the table itself stays usable.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn token_prefix(token: &str) -> &str {
    &token[..token.len().min(TOKEN_LOG_PREFIX)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn file_ref() -> FileRef {
        FileRef {
            id: "file-1".to_string(),
            filename: "report.pdf".to_string(),
        }
    }

    fn owned_lookup(file_id: &str, owner_id: &str) -> Option<FileRef> {
        (file_id == "file-1" && owner_id == "user-1").then(file_ref)
    }

    fn plain_fetch(_file_id: &str) -> Option<Result<Vec<u8>, CryptoError>> {
        Some(Ok(b"file contents".to_vec()))
    }

    #[test]
    fn issue_requires_ownership() {
        let registry = LinkRegistry::new();

        let err = registry
            .issue("file-1", "hunter2", "someone-else", owned_lookup)
            .unwrap_err();
        assert!(matches!(err, LinkError::NotFoundOrUnauthorized));

        let err = registry
            .issue("missing", "hunter2", "user-1", owned_lookup)
            .unwrap_err();
        assert!(matches!(err, LinkError::NotFoundOrUnauthorized));
    }

    #[test]
    fn issue_returns_hex_token() {
        let registry = LinkRegistry::new();
        let token = registry
            .issue("file-1", "hunter2", "user-1", owned_lookup)
            .unwrap();

        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(registry.outstanding(), 1);
    }

    #[test]
    fn redeem_without_password_prompts_and_spends_nothing() {
        let registry = LinkRegistry::new();
        let token = registry
            .issue("file-1", "hunter2", "user-1", owned_lookup)
            .unwrap();

        for _ in 0..5 {
            let outcome = registry.redeem(&token, None, plain_fetch).unwrap();
            assert_eq!(outcome, Redemption::PasswordPrompt);
        }

        // Entry still live and fully redeemable
        let outcome = registry.redeem(&token, Some("hunter2"), plain_fetch).unwrap();
        assert!(matches!(outcome, Redemption::Success { .. }));
    }

    #[test]
    fn redeem_is_single_use() {
        let registry = LinkRegistry::new();
        let token = registry
            .issue("file-1", "hunter2", "user-1", owned_lookup)
            .unwrap();

        let outcome = registry.redeem(&token, Some("hunter2"), plain_fetch).unwrap();
        match outcome {
            Redemption::Success { filename, bytes } => {
                assert_eq!(filename, "report.pdf");
                assert_eq!(bytes, b"file contents");
            }
            other => panic!("expected success, got {other:?}"),
        }

        let outcome = registry.redeem(&token, Some("hunter2"), plain_fetch).unwrap();
        assert_eq!(outcome, Redemption::NotFound);
        assert_eq!(registry.outstanding(), 0);
    }

    #[test]
    fn three_wrong_passwords_revoke_the_link() {
        let registry = LinkRegistry::new();
        let token = registry
            .issue("file-1", "hunter2", "user-1", owned_lookup)
            .unwrap();

        let outcome = registry.redeem(&token, Some("wrong1"), plain_fetch).unwrap();
        assert_eq!(outcome, Redemption::InvalidPassword { attempts_remaining: 2 });

        let outcome = registry.redeem(&token, Some("wrong2"), plain_fetch).unwrap();
        assert_eq!(outcome, Redemption::InvalidPassword { attempts_remaining: 1 });

        let outcome = registry.redeem(&token, Some("wrong3"), plain_fetch).unwrap();
        assert_eq!(outcome, Redemption::Revoked);

        // Correct password after revocation gets nothing
        let outcome = registry.redeem(&token, Some("hunter2"), plain_fetch).unwrap();
        assert_eq!(outcome, Redemption::NotFound);
    }

    #[test]
    fn expired_token_is_not_found_even_with_correct_password() {
        let registry = LinkRegistry::with_policy(Duration::zero(), MAX_ATTEMPTS);
        let token = registry
            .issue("file-1", "hunter2", "user-1", owned_lookup)
            .unwrap();

        std::thread::sleep(std::time::Duration::from_millis(5));

        let outcome = registry.redeem(&token, Some("hunter2"), plain_fetch).unwrap();
        assert_eq!(outcome, Redemption::NotFound);
        // Eviction happened on observation
        assert_eq!(registry.outstanding(), 0);
    }

    #[test]
    fn expiry_check_comes_before_attempt_accounting() {
        let registry = LinkRegistry::with_policy(Duration::zero(), MAX_ATTEMPTS);
        let token = registry
            .issue("file-1", "hunter2", "user-1", owned_lookup)
            .unwrap();

        std::thread::sleep(std::time::Duration::from_millis(5));

        let outcome = registry.redeem(&token, Some("wrong"), plain_fetch).unwrap();
        assert_eq!(outcome, Redemption::NotFound);
    }

    #[test]
    fn missing_file_consumes_the_entry() {
        let registry = LinkRegistry::new();
        let token = registry
            .issue("file-1", "hunter2", "user-1", owned_lookup)
            .unwrap();

        let outcome = registry
            .redeem(&token, Some("hunter2"), |_| None)
            .unwrap();
        assert_eq!(outcome, Redemption::FileGone);
        assert_eq!(registry.outstanding(), 0);
    }

    #[test]
    fn decryption_failure_keeps_the_entry() {
        let registry = LinkRegistry::new();
        let token = registry
            .issue("file-1", "hunter2", "user-1", owned_lookup)
            .unwrap();

        let result = registry.redeem(&token, Some("hunter2"), |_| {
            Some(Err(CryptoError::DecryptionFailed))
        });
        assert!(matches!(result, Err(LinkError::Crypto(_))));
        assert_eq!(registry.outstanding(), 1);
    }

    #[test]
    fn purge_expired_sweeps_dead_entries() {
        let registry = LinkRegistry::with_policy(Duration::zero(), MAX_ATTEMPTS);
        for _ in 0..3 {
            registry
                .issue("file-1", "hunter2", "user-1", owned_lookup)
                .unwrap();
        }
        assert_eq!(registry.outstanding(), 3);

        std::thread::sleep(std::time::Duration::from_millis(5));
        assert_eq!(registry.purge_expired(), 3);
        assert_eq!(registry.outstanding(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_redemption_yields_exactly_one_success() {
        let registry = Arc::new(LinkRegistry::new());
        let token = registry
            .issue("file-1", "hunter2", "user-1", owned_lookup)
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let registry = Arc::clone(&registry);
            let token = token.clone();
            handles.push(tokio::task::spawn_blocking(move || {
                registry.redeem(&token, Some("hunter2"), plain_fetch).unwrap()
            }));
        }

        let mut successes = 0;
        let mut not_found = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Redemption::Success { .. } => successes += 1,
                Redemption::NotFound => not_found += 1,
                other => panic!("unexpected outcome {other:?}"),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(not_found, 7);
    }
}
