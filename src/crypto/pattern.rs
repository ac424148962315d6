// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 GridShare Contributors

//! Grid-pattern credentials.
//!
//! Instead of a typed password, a user selects an ordered sequence of cells
//! on a grid. The credential is the canonical string
//! `"{gridSize}-{gridShape}-{pattern joined by '-'}"`, hashed with Argon2id
//! before storage. Order is significant: two permutations of the same cell
//! set are different secrets, so derivation never sorts or deduplicates.
//!
//! The same hash/verify pair is reused for one-time link passwords.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::CryptoError;

/// Smallest grid the UI can draw.
pub const MIN_GRID_SIZE: u32 = 2;
/// Largest grid the UI can draw.
pub const MAX_GRID_SIZE: u32 = 10;
/// Minimum number of cells in a pattern.
pub const MIN_PATTERN_LEN: usize = 3;

/// Layout of the selection grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GridShape {
    Square,
    Circle,
    Triangle,
}

impl std::fmt::Display for GridShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridShape::Square => write!(f, "square"),
            GridShape::Circle => write!(f, "circle"),
            GridShape::Triangle => write!(f, "triangle"),
        }
    }
}

impl GridShape {
    /// Exclusive upper bound for cell indices on a grid of `size`.
    ///
    /// Square grids number cells row-major over `size x size`. Circular
    /// grids reuse the square numbering and simply omit cells outside the
    /// inscribed circle, so their index space is the same. Triangular grids
    /// number row `r` with `r + 1` cells.
    pub fn cell_bound(&self, size: u32) -> u32 {
        match self {
            GridShape::Square | GridShape::Circle => size * size,
            GridShape::Triangle => size * (size + 1) / 2,
        }
    }
}

/// Validation failure for a submitted pattern.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatternError {
    #[error("grid size must be between {MIN_GRID_SIZE} and {MAX_GRID_SIZE}, got {0}")]
    GridSizeOutOfRange(u32),
    #[error("pattern must contain at least {MIN_PATTERN_LEN} cells, got {0}")]
    PatternTooShort(usize),
    #[error("cell index {index} is out of bounds for a {shape} grid of size {size}")]
    CellOutOfBounds {
        index: u32,
        shape: GridShape,
        size: u32,
    },
    #[error("cell index {0} selected more than once")]
    DuplicateCell(u32),
}

/// Validate a (grid size, shape, pattern) triple against the grid policy.
pub fn validate(grid_size: u32, shape: GridShape, pattern: &[u32]) -> Result<(), PatternError> {
    if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&grid_size) {
        return Err(PatternError::GridSizeOutOfRange(grid_size));
    }
    if pattern.len() < MIN_PATTERN_LEN {
        return Err(PatternError::PatternTooShort(pattern.len()));
    }

    let bound = shape.cell_bound(grid_size);
    let mut seen = std::collections::HashSet::new();
    for &index in pattern {
        if index >= bound {
            return Err(PatternError::CellOutOfBounds {
                index,
                shape,
                size: grid_size,
            });
        }
        if !seen.insert(index) {
            return Err(PatternError::DuplicateCell(index));
        }
    }
    Ok(())
}

/// Build the canonical secret string. Pattern order is preserved exactly as
/// selected.
pub fn canonical_secret(grid_size: u32, shape: GridShape, pattern: &[u32]) -> String {
    let mut secret = format!("{grid_size}-{shape}");
    for index in pattern {
        secret.push('-');
        secret.push_str(&index.to_string());
    }
    secret
}

/// Hash a secret string with Argon2id and a per-hash random salt.
///
/// Output is a PHC string that embeds algorithm, parameters, and salt, so
/// cost can be raised later without breaking stored hashes.
pub fn hash_secret(secret: &str) -> Result<String, CryptoError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|e| CryptoError::HashingFailed(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a candidate secret against a stored PHC hash string.
///
/// Comparison is constant-time inside the password-hash framework. A stored
/// hash that fails to parse verifies as false rather than erroring, so a
/// corrupt record behaves like a wrong credential.
pub fn verify_secret(candidate: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .is_ok()
}
