// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 GridShare Contributors

//! File upload, listing, download, and deletion.
//!
//! Contents are encrypted with the process-wide key before they reach
//! storage and decrypted on the way back out. Download is allowed for the
//! owner and for users the file was shared with; everyone else sees 404.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Response,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    auth::Auth,
    error::ApiError,
    models::{FileSummary, UploadResponse},
    state::AppState,
    storage::{FileRepository, ShareRepository, StoredFile},
};

use super::attachment_response;

#[utoipa::path(
    post,
    path = "/v1/files",
    tag = "Files",
    security(("bearer" = [])),
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "File stored encrypted", body = UploadResponse),
        (status = 400, description = "No file field in the request"),
    )
)]
pub async fn upload_file(
    Auth(user): Auth,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let mut uploaded: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::bad_request("Malformed multipart body."))?
    {
        if field.name() == Some("file") {
            let filename = field
                .file_name()
                .unwrap_or("upload.bin")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|_| ApiError::bad_request("Malformed multipart body."))?;
            uploaded = Some((filename, data.to_vec()));
        }
    }

    let Some((filename, data)) = uploaded else {
        return Err(ApiError::bad_request("No file uploaded."));
    };

    let payload = state.cipher.encrypt(&data).map_err(|e| {
        tracing::error!(error = %e, "file encryption failed");
        ApiError::internal("An error occurred during file upload.")
    })?;

    let file = StoredFile {
        id: Uuid::new_v4().to_string(),
        owner_id: user.user_id,
        filename,
        data: payload.ciphertext_hex,
        iv: payload.iv_hex,
        created_at: Utc::now(),
    };

    let repo = FileRepository::new(&state.storage);
    repo.create(&file).map_err(|e| {
        tracing::warn!(error = %e, "failed to store file record");
        ApiError::internal("An error occurred during file upload.")
    })?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            id: file.id,
            filename: file.filename,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/v1/files",
    tag = "Files",
    security(("bearer" = [])),
    responses((status = 200, description = "Files owned by the caller", body = [FileSummary]))
)]
pub async fn list_files(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<FileSummary>>, ApiError> {
    let repo = FileRepository::new(&state.storage);
    let files = repo.list_by_owner(&user.user_id).map_err(|e| {
        tracing::warn!(error = %e, "failed to list files");
        ApiError::internal("An error occurred while fetching files.")
    })?;

    Ok(Json(
        files
            .into_iter()
            .map(|f| FileSummary {
                id: f.id,
                filename: f.filename,
                created_at: f.created_at,
            })
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/v1/files/{file_id}",
    params(("file_id" = String, Path, description = "File identifier")),
    tag = "Files",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Decrypted file as attachment"),
        (status = 404, description = "File not found or unauthorized"),
    )
)]
pub async fn download_file(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> Result<Response, ApiError> {
    let files = FileRepository::new(&state.storage);

    let file = match files.get_owned(&file_id, &user.user_id) {
        Ok(file) => file,
        Err(_) => {
            // Not the owner; a share grant also allows download
            let shares = ShareRepository::new(&state.storage);
            let granted = shares
                .grant_exists(&file_id, &user.user_id)
                .unwrap_or(false);
            if !granted {
                return Err(ApiError::not_found("File not found or unauthorized"));
            }
            files
                .get(&file_id)
                .map_err(|_| ApiError::not_found("File not found or unauthorized"))?
        }
    };

    let bytes = state.cipher.decrypt(&file.data, &file.iv).map_err(|e| {
        tracing::warn!(error = %e, file_id = %file.id, "file decryption failed");
        ApiError::internal("File decryption failed.")
    })?;

    Ok(attachment_response(&file.filename, bytes))
}

#[utoipa::path(
    delete,
    path = "/v1/files/{file_id}",
    params(("file_id" = String, Path, description = "File identifier")),
    tag = "Files",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "File deleted"),
        (status = 404, description = "File not found or unauthorized"),
    )
)]
pub async fn delete_file(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> Result<(), ApiError> {
    let repo = FileRepository::new(&state.storage);
    repo.delete_owned(&file_id, &user.user_id)
        .map_err(|_| ApiError::not_found("File not found or unauthorized"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthenticatedUser;
    use crate::state::test_support::test_state;

    fn auth(user_id: &str) -> Auth {
        Auth(AuthenticatedUser {
            user_id: user_id.to_string(),
            email: format!("{user_id}@example.com"),
        })
    }

    fn stored_file(state: &AppState, owner: &str, contents: &[u8]) -> StoredFile {
        let payload = state.cipher.encrypt(contents).expect("encrypt");
        let file = StoredFile {
            id: Uuid::new_v4().to_string(),
            owner_id: owner.to_string(),
            filename: "notes.txt".to_string(),
            data: payload.ciphertext_hex,
            iv: payload.iv_hex,
            created_at: Utc::now(),
        };
        FileRepository::new(&state.storage)
            .create(&file)
            .expect("create file");
        file
    }

    #[tokio::test]
    async fn list_files_shows_only_own_files() {
        let (state, _tmp) = test_state();
        stored_file(&state, "u-1", b"one");
        stored_file(&state, "u-1", b"two");
        stored_file(&state, "u-2", b"other");

        let Json(files) = list_files(auth("u-1"), State(state))
            .await
            .expect("list succeeds");
        assert_eq!(files.len(), 2);
    }

    #[tokio::test]
    async fn download_decrypts_own_file() {
        let (state, _tmp) = test_state();
        let file = stored_file(&state, "u-1", b"attack at dawn");

        let response = download_file(auth("u-1"), State(state), Path(file.id))
            .await
            .expect("download succeeds");
        assert_eq!(response.status(), StatusCode::OK);

        let disposition = response
            .headers()
            .get(axum::http::header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(disposition.contains("notes.txt"));

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"attack at dawn");
    }

    #[tokio::test]
    async fn download_requires_ownership_or_grant() {
        let (state, _tmp) = test_state();
        let file = stored_file(&state, "u-1", b"private");

        let err = download_file(auth("u-2"), State(state.clone()), Path(file.id.clone()))
            .await
            .expect_err("stranger cannot download");
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        // Grant access and retry
        ShareRepository::new(&state.storage)
            .create(&crate::storage::StoredShare {
                id: Uuid::new_v4().to_string(),
                file_id: file.id.clone(),
                owner_id: "u-1".to_string(),
                recipient_id: "u-2".to_string(),
                shared_at: Utc::now(),
            })
            .expect("create grant");

        let response = download_file(auth("u-2"), State(state), Path(file.id))
            .await
            .expect("recipient can download");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn delete_enforces_ownership() {
        let (state, _tmp) = test_state();
        let file = stored_file(&state, "u-1", b"mine");

        let err = delete_file(auth("u-2"), State(state.clone()), Path(file.id.clone()))
            .await
            .expect_err("stranger cannot delete");
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        delete_file(auth("u-1"), State(state.clone()), Path(file.id.clone()))
            .await
            .expect("owner can delete");

        assert!(!FileRepository::new(&state.storage).exists(&file.id));
    }
}
