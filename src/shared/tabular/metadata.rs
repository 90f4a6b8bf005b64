use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use super::table::Table;

/// Per-file summary captured at upload time and stored as JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FileMetadata {
    /// Column names in file order
    pub columns: Vec<String>,
    /// Column name to type label (`int64`, `float64`, `bool`, `datetime64[ns]`, `object`)
    #[schema(value_type = Object, example = json!({"city": "object", "sales": "float64"}))]
    pub dtypes: Map<String, Value>,
    pub num_rows: usize,
}

/// Summarise a loaded table. Type labels come straight from the loader's inference.
pub fn extract_metadata(table: &Table) -> FileMetadata {
    let dtypes = table
        .columns()
        .iter()
        .map(|c| (c.name.clone(), Value::String(c.dtype.label().to_string())))
        .collect();

    FileMetadata {
        columns: table.column_names(),
        dtypes,
        num_rows: table.num_rows(),
    }
}
