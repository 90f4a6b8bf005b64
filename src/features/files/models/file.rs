use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::shared::tabular::FileMetadata;

/// Database model for uploaded files
#[derive(Debug, Clone, FromRow)]
pub struct File {
    pub id: i64,
    /// Name of the stored file inside the upload directory
    pub filename: String,
    pub upload_time: DateTime<Utc>,
    pub user_id: i64,
    pub file_metadata: Option<Json<FileMetadata>>,
}
