use axum::{
    extract::{Multipart, State},
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppPath;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::files::dtos::{FileResponseDto, UploadFileDto, UploadResponseDto};
use crate::features::files::services::FileService;
use crate::shared::types::{ErrorResponse, MessageResponse};
use crate::shared::validation::{is_allowed_file, secure_filename};

/// Upload a CSV or Excel file
///
/// Accepts multipart/form-data with a single `file` field. The file is parsed once to
/// capture its columns, types and row count.
#[utoipa::path(
    post,
    path = "/files/upload",
    tag = "files",
    request_body(
        content = UploadFileDto,
        content_type = "multipart/form-data",
        description = "Tabular file (csv, xls, xlsx)",
    ),
    responses(
        (status = 200, description = "File uploaded", body = UploadResponseDto),
        (status = 400, description = "Missing file, bad type or unparseable contents", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 413, description = "File too large")
    ),
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    )
)]
pub async fn upload_file(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponseDto>> {
    let mut upload: Option<(Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        if field.name() != Some("file") {
            debug!("Ignoring unknown field: {:?}", field.name());
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let data = field.bytes().await.map_err(|e| {
            debug!("Failed to read file bytes: {}", e);
            AppError::BadRequest(format!("Failed to read file data: {}", e))
        })?;

        upload = Some((file_name, data.to_vec()));
        break;
    }

    let (file_name, data) = upload.ok_or_else(|| AppError::BadRequest("No file part".to_string()))?;

    let file_name = file_name
        .filter(|name| !name.is_empty())
        .ok_or_else(|| AppError::BadRequest("No selected file".to_string()))?;

    // The extension must survive sanitising, otherwise the stored copy could not be parsed
    if !is_allowed_file(&file_name) || !is_allowed_file(&secure_filename(&file_name)) {
        return Err(AppError::BadRequest("Invalid file type".to_string()));
    }

    let response = service.upload(user.id, &file_name, &data).await?;
    Ok(Json(response))
}

/// List the current user's files
#[utoipa::path(
    get,
    path = "/files/list",
    tag = "files",
    responses(
        (status = 200, description = "Files owned by the current user", body = Vec<FileResponseDto>),
        (status = 401, description = "Authentication required", body = ErrorResponse)
    ),
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    )
)]
pub async fn list_files(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
) -> Result<Json<Vec<FileResponseDto>>> {
    let files = service.list(user.id).await?;
    Ok(Json(files))
}

/// Delete a file from disk and from the user's list
#[utoipa::path(
    delete,
    path = "/files/delete/{file_id}",
    tag = "files",
    params(
        ("file_id" = i64, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File deleted", body = MessageResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 500, description = "Stored file could not be removed", body = ErrorResponse)
    ),
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    )
)]
pub async fn delete_file(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    AppPath(file_id): AppPath<i64>,
) -> Result<Json<MessageResponse>> {
    service.delete(file_id, user.id).await?;
    Ok(Json(MessageResponse::new("File deleted successfully")))
}

#[cfg(test)]
mod tests {
    use crate::features::files::routes::routes;
    use crate::shared::test_helpers::{file_service, session_cookie_header, with_session_auth};
    use axum::http::{header, StatusCode};
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use serde_json::json;
    use tempfile::TempDir;
    use tower_cookies::CookieManagerLayer;

    async fn server() -> (TempDir, TestServer) {
        let (dir, service) = file_service().await;
        let app = with_session_auth(routes(service, 1024 * 1024)).layer(CookieManagerLayer::new());
        (dir, TestServer::new(app).unwrap())
    }

    #[tokio::test]
    async fn test_upload_requires_file_part() {
        let (_dir, server) = server().await;
        let form = MultipartForm::new().add_text("note", "hello");

        let response = server
            .post("/files/upload")
            .add_header(header::COOKIE, session_cookie_header())
            .multipart(form)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "error": "No file part" }));
    }

    #[tokio::test]
    async fn test_upload_requires_file_name() {
        let (_dir, server) = server().await;
        let form = MultipartForm::new().add_part("file", Part::bytes(b"a,b\n1,2\n".to_vec()));

        let response = server
            .post("/files/upload")
            .add_header(header::COOKIE, session_cookie_header())
            .multipart(form)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "error": "No selected file" }));
    }

    #[tokio::test]
    async fn test_upload_rejects_other_extensions() {
        let (dir, server) = server().await;
        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(b"hello".to_vec()).file_name("notes.txt"),
        );

        let response = server
            .post("/files/upload")
            .add_header(header::COOKIE, session_cookie_header())
            .multipart(form)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "error": "Invalid file type" }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_upload_requires_session() {
        let (_dir, server) = server().await;
        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(b"a\n1\n".to_vec()).file_name("data.csv"),
        );

        let response = server.post("/files/upload").multipart(form).await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_list_requires_session() {
        let (_dir, server) = server().await;
        server
            .get("/files/list")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_delete_rejects_non_numeric_id() {
        let (_dir, server) = server().await;
        let response = server
            .delete("/files/delete/abc")
            .add_header(header::COOKIE, session_cookie_header())
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
