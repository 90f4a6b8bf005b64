use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::features::files::handlers::{delete_file, list_files, upload_file};
use crate::features::files::services::FileService;

/// Routes for the files feature (all require a session)
pub fn routes(file_service: Arc<FileService>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route(
            "/files/upload",
            post(upload_file).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/files/list", get(list_files))
        .route("/files/delete/{file_id}", delete(delete_file))
        .with_state(file_service)
}
