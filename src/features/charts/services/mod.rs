mod chart_service;
pub mod suggestion_engine;

pub use chart_service::ChartService;
