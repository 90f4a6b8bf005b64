use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::shared::prompts::TemplateError;
use crate::shared::tabular::TableError;
use crate::shared::types::ErrorResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Disk error: {0}")]
    Disk(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::BadRequest(_) | AppError::UnsupportedFileType(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Database(_)
            | AppError::ExternalServiceError(_)
            | AppError::Disk(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error occurred".to_string()
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            AppError::ExternalServiceError(ref msg) => {
                tracing::error!("External service error: {}", msg);
                msg.clone()
            }
            AppError::Disk(ref msg) => {
                tracing::error!("Disk error: {}", msg);
                msg.clone()
            }
            AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::UnsupportedFileType(msg) => msg,
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

impl From<TableError> for AppError {
    fn from(err: TableError) -> Self {
        match err {
            TableError::FileNotFound(_) => AppError::NotFound("File not found on server".to_string()),
            TableError::UnsupportedFileType(ext) => {
                AppError::UnsupportedFileType(format!("Unsupported file type: '{}'", ext))
            }
            TableError::Empty => AppError::Validation("File contains no data".to_string()),
            TableError::Csv(e) => AppError::Validation(format!("Failed to parse CSV file: {}", e)),
            TableError::Spreadsheet(msg) => {
                AppError::Validation(format!("Failed to parse spreadsheet: {}", msg))
            }
            TableError::Io(e) => AppError::Internal(format!("Failed to read file: {}", e)),
        }
    }
}

impl From<TemplateError> for AppError {
    fn from(err: TemplateError) -> Self {
        AppError::Internal(format!("Failed to render prompt: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
