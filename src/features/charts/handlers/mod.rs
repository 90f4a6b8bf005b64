pub mod chart_handler;

pub use chart_handler::{__path_chart_data, __path_suggest_charts, chart_data, suggest_charts};
