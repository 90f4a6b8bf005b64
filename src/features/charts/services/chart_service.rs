use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

use crate::core::error::Result;
use crate::features::charts::dtos::SuggestionsResponseDto;
use crate::features::charts::services::suggestion_engine::suggest_charts;
use crate::features::files::FileService;
use crate::shared::tabular::to_columnar_json;

/// Chart suggestions and chart data for the user's files
pub struct ChartService {
    files: Arc<FileService>,
}

impl ChartService {
    pub fn new(files: Arc<FileService>) -> Self {
        Self { files }
    }

    pub async fn suggest(&self, file_id: i64, user_id: i64) -> Result<SuggestionsResponseDto> {
        let (file, table) = self.files.load_owned(file_id, user_id).await?;
        let suggestions = suggest_charts(&table);

        debug!(
            "Suggested {} charts for file id={} ({})",
            suggestions.len(),
            file.id,
            file.filename
        );

        Ok(SuggestionsResponseDto {
            suggestions,
            columns: table.column_names(),
        })
    }

    /// Whole file as `{column: [values...]}`
    pub async fn data(&self, file_id: i64, user_id: i64) -> Result<Map<String, Value>> {
        let (_, table) = self.files.load_owned(file_id, user_id).await?;
        Ok(to_columnar_json(&table))
    }
}
