use crate::features::auth::handlers;
use crate::features::auth::services::AuthService;
use axum::{routing::post, Router};
use std::sync::Arc;

/// Public auth routes (no session required)
pub fn public_routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .with_state(service)
}

/// Protected auth routes (require a session)
pub fn protected_routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/auth/logout", post(handlers::logout))
        .with_state(service)
}
