// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 GridShare Contributors

//! JWT claims and authenticated user representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims carried in a GridShare session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's id
    pub sub: String,
    /// User's email address
    pub email: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Authenticated user information extracted from a verified token.
///
/// This is the authorization context every protected handler receives;
/// ownership checks compare against `user_id`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Canonical user ID
    pub user_id: String,
    /// Email address from the token
    pub email: String,
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authenticated_user_from_claims() {
        let claims = Claims {
            sub: "user-123".to_string(),
            email: "alice@example.com".to_string(),
            iat: 1700000000,
            exp: 1700003600,
        };

        let user = AuthenticatedUser::from(claims);
        assert_eq!(user.user_id, "user-123");
        assert_eq!(user.email, "alice@example.com");
    }
}
