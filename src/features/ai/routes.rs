use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::ai::handlers::{chat, get_summary};
use crate::features::ai::services::AiService;

/// Routes for the AI feature (all require a session)
pub fn routes(service: Arc<AiService>) -> Router {
    Router::new()
        .route("/ai/summary/{file_id}", get(get_summary))
        .route("/ai/chat", post(chat))
        .with_state(service)
}
