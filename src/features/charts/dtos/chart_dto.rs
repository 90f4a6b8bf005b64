use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// A chart the frontend can draw from the file's columns.
///
/// `x`/`y`/`r` name columns of the table; doughnut and radar carry their data inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChartSuggestion {
    Line {
        x: String,
        y: String,
        title: String,
    },
    Scatter {
        x: String,
        y: String,
        title: String,
    },
    Area {
        x: String,
        y: String,
        title: String,
    },
    /// `x` is the categorical column, `y` the numeric one
    Bar {
        x: String,
        y: String,
        title: String,
    },
    /// Largest group sums, descending
    Doughnut {
        #[schema(value_type = Vec<Object>)]
        labels: Vec<Value>,
        #[schema(value_type = Vec<f64>)]
        values: Vec<Value>,
        title: String,
    },
    Histogram {
        x: String,
        title: String,
    },
    /// Per-column means; null for a column with no values
    Radar {
        labels: Vec<String>,
        values: Vec<Option<f64>>,
        title: String,
    },
    Bubble {
        x: String,
        y: String,
        r: String,
        title: String,
    },
    Box {
        x: String,
        title: String,
    },
}

#[cfg(test)]
impl ChartSuggestion {
    pub fn title(&self) -> &str {
        match self {
            ChartSuggestion::Line { title, .. }
            | ChartSuggestion::Scatter { title, .. }
            | ChartSuggestion::Area { title, .. }
            | ChartSuggestion::Bar { title, .. }
            | ChartSuggestion::Doughnut { title, .. }
            | ChartSuggestion::Histogram { title, .. }
            | ChartSuggestion::Radar { title, .. }
            | ChartSuggestion::Bubble { title, .. }
            | ChartSuggestion::Box { title, .. } => title,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SuggestionsResponseDto {
    pub suggestions: Vec<ChartSuggestion>,
    /// Every column of the file, in order
    pub columns: Vec<String>,
}
