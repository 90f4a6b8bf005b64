use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::files::models::File;
use crate::shared::tabular::FileMetadata;

/// Upload file request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadFileDto {
    /// CSV, XLS or XLSX file
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// Response DTO for a successful upload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponseDto {
    #[schema(example = "File uploaded")]
    pub message: String,
    pub file_id: i64,
    pub file_metadata: FileMetadata,
}

/// One entry of the file listing
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FileResponseDto {
    pub id: i64,
    /// Stored name, possibly suffixed with ` (n)` to keep it unique
    #[schema(example = "sales (1).csv")]
    pub filename: String,
    pub upload_time: DateTime<Utc>,
    pub file_metadata: Option<FileMetadata>,
}

impl From<File> for FileResponseDto {
    fn from(file: File) -> Self {
        Self {
            id: file.id,
            filename: file.filename,
            upload_time: file.upload_time,
            file_metadata: file.file_metadata.map(|json| json.0),
        }
    }
}
