// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 GridShare Contributors

//! # Authentication Module
//!
//! Bearer-token authentication for the GridShare API.
//!
//! ## Auth Flow
//!
//! 1. User signs in with their grid pattern; the server verifies the
//!    pattern hash and issues an HS256 JWT valid for one hour.
//! 2. Clients send `Authorization: Bearer <token>` on protected routes.
//! 3. The `Auth` extractor verifies signature and expiry and hands the
//!    handler an [`AuthenticatedUser`] carrying the user id and email.
//!
//! The one-time link download route deliberately skips this gate: the
//! redemption token plus link password are the whole capability there.

pub mod claims;
pub mod error;
pub mod extractor;
pub mod tokens;

pub use claims::{AuthenticatedUser, Claims};
pub use error::AuthError;
pub use extractor::Auth;
