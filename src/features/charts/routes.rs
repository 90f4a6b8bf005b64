use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::charts::handlers::{chart_data, suggest_charts};
use crate::features::charts::services::ChartService;

/// Routes for the charts feature (all require a session)
pub fn routes(service: Arc<ChartService>) -> Router {
    Router::new()
        .route("/charts/suggest/{file_id}", get(suggest_charts))
        .route("/charts/data/{file_id}", get(chart_data))
        .with_state(service)
}
