// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 GridShare Contributors

//! GridShare - Pattern-Authenticated File Sharing Service
//!
//! This crate provides a file sharing service where users authenticate by
//! drawing a pattern on a grid instead of typing a password. Files are
//! encrypted at rest with AES-256-CBC and can be shared with other users
//! or handed out through password-protected one-time download links.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Bearer-token authentication (JWT)
//! - `crypto` - Pattern hashing and file encryption
//! - `links` - One-time link registry
//! - `storage` - JSON-file data store and repositories

pub mod api;
pub mod auth;
pub mod config;
pub mod crypto;
pub mod error;
pub mod links;
pub mod models;
pub mod state;
pub mod storage;
