//! Loading uploaded CSV/Excel files into typed, column-oriented tables and
//! deriving what the rest of the service needs from them.

pub mod loader;
pub mod metadata;
pub mod preview;
pub mod serializer;
pub mod table;

pub use loader::load_table;
pub use metadata::{extract_metadata, FileMetadata};
pub use preview::render_preview;
pub use serializer::to_columnar_json;
pub use table::{CellValue, Column, DType, Table};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Unsupported file type: '{0}'")]
    UnsupportedFileType(String),

    #[error("File contains no data")]
    Empty,

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet parse error: {0}")]
    Spreadsheet(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
