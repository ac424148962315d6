// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 GridShare Contributors

//! One-time link issuance and redemption endpoints.
//!
//! Issuance requires authentication and file ownership. Redemption is the
//! one route with no bearer-token gate: the redemption token plus the link
//! password are the entire capability.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::{
    auth::Auth,
    error::ApiError,
    links::{FileRef, LinkError, Redemption, LINK_TTL_MINUTES},
    models::{GenerateLinkRequest, GenerateLinkResponse},
    state::AppState,
    storage::FileRepository,
};

use super::attachment_response;

/// Minimum length for a link password, matching the web client's rule.
const MIN_LINK_PASSWORD_LEN: usize = 6;

#[utoipa::path(
    post,
    path = "/v1/links",
    request_body = GenerateLinkRequest,
    tag = "Links",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "One-time link generated", body = GenerateLinkResponse),
        (status = 404, description = "File not found or unauthorized"),
    )
)]
pub async fn generate_link(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(request): Json<GenerateLinkRequest>,
) -> Result<Json<GenerateLinkResponse>, ApiError> {
    if request.file_id.is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("File ID and password are required."));
    }
    if request.password.len() < MIN_LINK_PASSWORD_LEN {
        return Err(ApiError::bad_request(
            "Password must be at least 6 characters.",
        ));
    }

    let files = FileRepository::new(&state.storage);
    let token = state
        .links
        .issue(
            &request.file_id,
            &request.password,
            &user.user_id,
            |file_id, owner_id| {
                files.get_owned(file_id, owner_id).ok().map(|f| FileRef {
                    id: f.id,
                    filename: f.filename,
                })
            },
        )
        .map_err(|e| match e {
            LinkError::NotFoundOrUnauthorized => {
                ApiError::not_found("File not found or unauthorized.")
            }
            other => {
                tracing::error!(error = %other, "link issuance failed");
                ApiError::internal("Failed to generate link")
            }
        })?;

    let link = format!("{}/v1/links/{token}", state.config.public_base_url);
    Ok(Json(GenerateLinkResponse {
        link,
        expires_in: format!("{LINK_TTL_MINUTES} minutes"),
    }))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RedeemQuery {
    /// Link password; omitting it signals the client to prompt for one
    pub password: Option<String>,
}

#[utoipa::path(
    get,
    path = "/v1/links/{token}",
    params(
        ("token" = String, Path, description = "Redemption token"),
        RedeemQuery,
    ),
    tag = "Links",
    responses(
        (status = 200, description = "Password prompt, or the decrypted file as attachment"),
        (status = 401, description = "Invalid password or link revoked"),
        (status = 404, description = "Invalid or expired link, or file gone"),
    )
)]
pub async fn redeem_link(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Query(query): Query<RedeemQuery>,
) -> Response {
    let files = FileRepository::new(&state.storage);
    let cipher = state.cipher.clone();

    let result = state
        .links
        .redeem(&token, query.password.as_deref(), |file_id| {
            let file = files.get(file_id).ok()?;
            Some(cipher.decrypt(&file.data, &file.iv))
        });

    match result {
        Ok(Redemption::PasswordPrompt) => (
            StatusCode::OK,
            Json(json!({ "passwordRequired": true })),
        )
            .into_response(),
        Ok(Redemption::Success { filename, bytes }) => attachment_response(&filename, bytes),
        Ok(Redemption::InvalidPassword { attempts_remaining }) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": format!("Invalid password. {attempts_remaining} attempts remaining."),
                "attemptsRemaining": attempts_remaining,
            })),
        )
            .into_response(),
        Ok(Redemption::Revoked) => {
            ApiError::unauthorized("Too many failed attempts. Link revoked.").into_response()
        }
        Ok(Redemption::NotFound) => {
            ApiError::not_found("Invalid or expired link.").into_response()
        }
        Ok(Redemption::FileGone) => {
            ApiError::not_found("File no longer exists.").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "link redemption failed");
            ApiError::internal("File decryption failed.").into_response()
        }
    }
}
