mod chart_dto;

pub use chart_dto::{ChartSuggestion, SuggestionsResponseDto};
