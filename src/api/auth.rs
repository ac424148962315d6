// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 GridShare Contributors

//! Signup and signin endpoints.
//!
//! Signin failures are a single generic "Invalid credentials" regardless
//! of whether the email was unknown or the pattern wrong, so the endpoint
//! cannot be used to enumerate registered addresses.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    auth::tokens,
    crypto::{self, pattern},
    error::ApiError,
    models::{SigninRequest, SigninResponse, SignupRequest, SignupResponse},
    state::AppState,
    storage::{StorageError, StoredUser, UserRepository},
};

#[utoipa::path(
    post,
    path = "/v1/auth/signup",
    request_body = SignupRequest,
    tag = "Auth",
    responses(
        (status = 201, description = "User registered", body = SignupResponse),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Invalid grid pattern"),
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    if request.username.trim().is_empty() || request.email.trim().is_empty() {
        return Err(ApiError::bad_request("All fields are required."));
    }

    pattern::validate(request.grid_size, request.grid_shape, &request.pattern)
        .map_err(|e| ApiError::unprocessable(e.to_string()))?;

    let secret = pattern::canonical_secret(request.grid_size, request.grid_shape, &request.pattern);
    let secret_hash = crypto::hash_secret(&secret).map_err(|e| {
        tracing::error!(error = %e, "pattern hashing failed during signup");
        ApiError::internal("An error occurred while registering.")
    })?;

    let user = StoredUser {
        id: Uuid::new_v4().to_string(),
        username: request.username,
        email: request.email,
        grid_size: request.grid_size,
        grid_shape: request.grid_shape,
        secret_hash,
        created_at: Utc::now(),
    };

    let repo = UserRepository::new(&state.storage);
    repo.create(&user).map_err(|e| match e {
        StorageError::AlreadyExists(_) => {
            ApiError::conflict("User already exists with this email.")
        }
        other => {
            tracing::warn!(error = %other, "failed to store user record");
            ApiError::internal("An error occurred while registering.")
        }
    })?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            user_id: user.id,
            message: "User registered successfully. Please log in.".to_string(),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/v1/auth/signin",
    request_body = SigninRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Signed in", body = SigninResponse),
        (status = 401, description = "Invalid credentials"),
    )
)]
pub async fn signin(
    State(state): State<AppState>,
    Json(request): Json<SigninRequest>,
) -> Result<Json<SigninResponse>, ApiError> {
    let repo = UserRepository::new(&state.storage);
    let user = repo
        .get_by_email(&request.email)
        .map_err(|_| ApiError::unauthorized("Invalid credentials"))?;

    // The candidate canonical string embeds grid size and shape, so a
    // pattern drawn on the wrong geometry never verifies.
    let candidate =
        pattern::canonical_secret(request.grid_size, request.grid_shape, &request.pattern);
    if !crypto::verify_secret(&candidate, &user.secret_hash) {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let token = tokens::issue(&user.id, &user.email, &state.config.jwt_secret).map_err(|e| {
        tracing::error!(error = %e, "token issuance failed");
        ApiError::internal("An error occurred while signing in.")
    })?;

    Ok(Json(SigninResponse {
        token,
        user_id: user.id,
        email: user.email,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::GridShape;
    use crate::state::test_support::test_state;

    fn signup_request() -> SignupRequest {
        SignupRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            grid_size: 4,
            grid_shape: GridShape::Square,
            pattern: vec![0, 5, 10, 15],
        }
    }

    #[tokio::test]
    async fn signup_then_signin_succeeds() {
        let (state, _tmp) = test_state();

        let (status, Json(created)) = signup(State(state.clone()), Json(signup_request()))
            .await
            .expect("signup succeeds");
        assert_eq!(status, StatusCode::CREATED);

        let Json(session) = signin(
            State(state),
            Json(SigninRequest {
                email: "alice@example.com".to_string(),
                grid_size: 4,
                grid_shape: GridShape::Square,
                pattern: vec![0, 5, 10, 15],
            }),
        )
        .await
        .expect("signin succeeds");

        assert_eq!(session.user_id, created.user_id);
        assert_eq!(session.email, "alice@example.com");
        assert!(!session.token.is_empty());
    }

    #[tokio::test]
    async fn signup_rejects_duplicate_email() {
        let (state, _tmp) = test_state();

        signup(State(state.clone()), Json(signup_request()))
            .await
            .expect("first signup succeeds");

        let err = signup(State(state), Json(signup_request()))
            .await
            .expect_err("duplicate email rejected");
        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn signup_rejects_short_pattern() {
        let (state, _tmp) = test_state();

        let mut request = signup_request();
        request.pattern = vec![0, 1];

        let err = signup(State(state), Json(request))
            .await
            .expect_err("short pattern rejected");
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn signin_wrong_pattern_is_generic_401() {
        let (state, _tmp) = test_state();

        signup(State(state.clone()), Json(signup_request()))
            .await
            .expect("signup succeeds");

        // Same cells, different order
        let err = signin(
            State(state.clone()),
            Json(SigninRequest {
                email: "alice@example.com".to_string(),
                grid_size: 4,
                grid_shape: GridShape::Square,
                pattern: vec![15, 10, 5, 0],
            }),
        )
        .await
        .expect_err("permuted pattern rejected");
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.message, "Invalid credentials");

        // Unknown email yields the identical error
        let err = signin(
            State(state),
            Json(SigninRequest {
                email: "nobody@example.com".to_string(),
                grid_size: 4,
                grid_shape: GridShape::Square,
                pattern: vec![0, 5, 10, 15],
            }),
        )
        .await
        .expect_err("unknown email rejected");
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.message, "Invalid credentials");
    }

    #[tokio::test]
    async fn signin_wrong_shape_is_rejected() {
        let (state, _tmp) = test_state();

        signup(State(state.clone()), Json(signup_request()))
            .await
            .expect("signup succeeds");

        let err = signin(
            State(state),
            Json(SigninRequest {
                email: "alice@example.com".to_string(),
                grid_size: 4,
                grid_shape: GridShape::Circle,
                pattern: vec![0, 5, 10, 15],
            }),
        )
        .await
        .expect_err("wrong shape rejected");
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }
}
