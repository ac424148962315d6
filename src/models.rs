// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 GridShare Contributors

//! Request and response payloads for the HTTP API.
//!
//! Field names follow the JSON wire format used by the web client
//! (camelCase).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::crypto::GridShape;

/// Request body for POST /v1/auth/signup
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub grid_size: u32,
    pub grid_shape: GridShape,
    /// Ordered cell indices, exactly as tapped
    pub pattern: Vec<u32>,
}

/// Response body for POST /v1/auth/signup
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub user_id: String,
    pub message: String,
}

/// Request body for POST /v1/auth/signin
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SigninRequest {
    pub email: String,
    pub grid_size: u32,
    pub grid_shape: GridShape,
    pub pattern: Vec<u32>,
}

/// Response body for POST /v1/auth/signin
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SigninResponse {
    pub token: String,
    pub user_id: String,
    pub email: String,
}

/// One uploaded file, as listed to its owner.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    pub id: String,
    pub filename: String,
    pub created_at: DateTime<Utc>,
}

/// Response body for POST /v1/files
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub id: String,
    pub filename: String,
}

/// Request body for POST /v1/shares
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShareRequest {
    pub file_id: String,
    pub recipient_user_id: String,
}

/// One file shared with the caller, as listed by GET /v1/shares.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SharedFileView {
    pub file_id: String,
    pub filename: String,
    pub owner_id: String,
    pub shared_at: DateTime<Utc>,
}

/// Request body for POST /v1/links
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateLinkRequest {
    pub file_id: String,
    pub password: String,
}

/// Response body for POST /v1/links
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateLinkResponse {
    /// Full redemption URL with the token as the final path segment
    pub link: String,
    pub expires_in: String,
}

/// Response body for GET /v1/users/me
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserMeResponse {
    pub user_id: String,
    pub email: String,
}
