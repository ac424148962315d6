// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 GridShare Contributors

//! Direct user-to-user file sharing.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    auth::Auth,
    error::ApiError,
    models::{ShareRequest, SharedFileView},
    state::AppState,
    storage::{FileRepository, ShareRepository, StoredShare, UserRepository},
};

#[utoipa::path(
    post,
    path = "/v1/shares",
    request_body = ShareRequest,
    tag = "Shares",
    security(("bearer" = [])),
    responses(
        (status = 201, description = "File shared"),
        (status = 404, description = "File or recipient not found"),
    )
)]
pub async fn share_file(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(request): Json<ShareRequest>,
) -> Result<StatusCode, ApiError> {
    if request.recipient_user_id == user.user_id {
        return Err(ApiError::bad_request("Cannot share a file with yourself."));
    }

    let files = FileRepository::new(&state.storage);
    let file = files
        .get_owned(&request.file_id, &user.user_id)
        .map_err(|_| ApiError::not_found("File not found or unauthorized."))?;

    let users = UserRepository::new(&state.storage);
    if !users.exists(&request.recipient_user_id) {
        return Err(ApiError::not_found("Recipient not found."));
    }

    let shares = ShareRepository::new(&state.storage);
    let share = StoredShare {
        id: Uuid::new_v4().to_string(),
        file_id: file.id,
        owner_id: user.user_id,
        recipient_id: request.recipient_user_id,
        shared_at: Utc::now(),
    };
    shares.create(&share).map_err(|e| {
        tracing::warn!(error = %e, "failed to store share grant");
        ApiError::internal("An error occurred while sharing the file.")
    })?;

    Ok(StatusCode::CREATED)
}

#[utoipa::path(
    get,
    path = "/v1/shares",
    tag = "Shares",
    security(("bearer" = [])),
    responses((status = 200, description = "Files shared with the caller", body = [SharedFileView]))
)]
pub async fn list_shared_with_me(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<SharedFileView>>, ApiError> {
    let shares = ShareRepository::new(&state.storage)
        .list_for_recipient(&user.user_id)
        .map_err(|e| {
            tracing::warn!(error = %e, "failed to list share grants");
            ApiError::internal("An error occurred while fetching shared files.")
        })?;

    let files = FileRepository::new(&state.storage);
    let mut views = Vec::new();
    for share in shares {
        // Grants whose file was deleted are simply skipped
        if let Ok(file) = files.get(&share.file_id) {
            views.push(SharedFileView {
                file_id: file.id,
                filename: file.filename,
                owner_id: share.owner_id,
                shared_at: share.shared_at,
            });
        }
    }

    Ok(Json(views))
}
