// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 GridShare Contributors

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        FileSummary, GenerateLinkRequest, GenerateLinkResponse, ShareRequest, SharedFileView,
        SigninRequest, SigninResponse, SignupRequest, SignupResponse, UploadResponse,
        UserMeResponse,
    },
    state::AppState,
};

pub mod auth;
pub mod files;
pub mod links;
pub mod shares;
pub mod users;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/signin", post(auth::signin))
        .route("/users/me", get(users::get_current_user))
        .route("/files", get(files::list_files).post(files::upload_file))
        .route(
            "/files/{file_id}",
            get(files::download_file).delete(files::delete_file),
        )
        .route(
            "/shares",
            get(shares::list_shared_with_me).post(shares::share_file),
        )
        .route("/links", post(links::generate_link))
        .route("/links/{token}", get(links::redeem_link))
        .with_state(state);

    Router::new()
        .route("/health", get(health))
        .nest("/v1", v1_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn health() -> StatusCode {
    StatusCode::OK
}

/// Builds a download response carrying decrypted file bytes as an attachment.
///
/// Quotes in the filename are stripped rather than escaped so the header
/// value stays parseable.
pub(crate) fn attachment_response(filename: &str, bytes: Vec<u8>) -> Response {
    let safe_name: String = filename.chars().filter(|c| *c != '"' && *c != '\n').collect();
    let disposition = format!("attachment; filename=\"{safe_name}\"");
    let disposition = HeaderValue::from_str(&disposition)
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    (
        [
            (header::CONTENT_DISPOSITION, disposition),
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/octet-stream"),
            ),
        ],
        bytes,
    )
        .into_response()
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::signup,
        auth::signin,
        users::get_current_user,
        files::list_files,
        files::upload_file,
        files::download_file,
        files::delete_file,
        shares::share_file,
        shares::list_shared_with_me,
        links::generate_link,
        links::redeem_link
    ),
    components(
        schemas(
            SignupRequest,
            SignupResponse,
            SigninRequest,
            SigninResponse,
            UserMeResponse,
            FileSummary,
            UploadResponse,
            ShareRequest,
            SharedFileView,
            GenerateLinkRequest,
            GenerateLinkResponse
        )
    ),
    tags(
        (name = "Auth", description = "Grid-pattern signup and signin"),
        (name = "Users", description = "Current user profile"),
        (name = "Files", description = "Encrypted file upload and download"),
        (name = "Shares", description = "File sharing between users"),
        (name = "Links", description = "One-time download links")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
