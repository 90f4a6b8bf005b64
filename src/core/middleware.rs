use crate::core::error::AppError;
use crate::features::auth::SessionService;
use crate::shared::constants::SESSION_COOKIE_NAME;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::prelude::*;
use std::sync::Arc;
use tower_cookies::Cookies;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

/// Request ID generator using UUID v7 (time-ordered)
#[derive(Clone, Copy)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::now_v7().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Custom MakeSpan that includes request_id in the tracing span
#[derive(Clone, Debug)]
pub struct MakeSpanWithRequestId;

impl<B> tower_http::trace::MakeSpan<B> for MakeSpanWithRequestId {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> Span {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    }
}

/// CORS for the browser frontend.
///
/// Explicit origins get credentialed CORS so the session cookie is sent. A `*` entry
/// allows any origin, which browsers only accept without credentials.
pub fn cors_layer(allowed_origins: Vec<String>) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if allowed_origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(AllowOrigin::list(origins))
            .allow_credentials(true)
    }
}

pub fn basic_auth_middleware(
    valid_credentials: Arc<String>,
) -> impl Fn(
    Request,
    Next,
)
    -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, Response>> + Send>>
       + Clone {
    move |req: Request, next: Next| {
        let credentials = valid_credentials.clone();
        Box::pin(async move {
            let auth_header = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|header| header.to_str().ok());

            if let Some(auth_header) = auth_header {
                if let Some(encoded) = auth_header.strip_prefix("Basic ") {
                    if let Ok(decoded) = BASE64_STANDARD.decode(encoded) {
                        if let Ok(creds) = String::from_utf8(decoded) {
                            if creds == *credentials {
                                return Ok(next.run(req).await);
                            }
                        }
                    }
                }
            }

            Err((
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Basic realm=\"Swagger UI\"")],
                "Unauthorized",
            )
                .into_response())
        })
    }
}

/// Session token from the `session` cookie, or from an `Authorization: Bearer` header
fn session_token(cookies: &Cookies, req: &Request) -> Option<String> {
    if let Some(cookie) = cookies.get(SESSION_COOKIE_NAME) {
        return Some(cookie.value().to_string());
    }

    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string)
}

pub async fn auth_middleware(
    State(sessions): State<Arc<SessionService>>,
    cookies: Cookies,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = session_token(&cookies, &req)
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    let user = sessions.validate(&token)?;

    // Insert authenticated user into request extensions
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::AuthenticatedUser;
    use crate::shared::test_helpers::{session_cookie_header, test_session_service, test_user};
    use axum::{middleware::from_fn_with_state, routing::get, Json, Router};
    use axum_test::TestServer;
    use tower_cookies::CookieManagerLayer;

    async fn whoami(user: AuthenticatedUser) -> Json<AuthenticatedUser> {
        Json(user)
    }

    fn server() -> TestServer {
        let app = Router::new()
            .route("/whoami", get(whoami))
            .route_layer(from_fn_with_state(test_session_service(), auth_middleware))
            .layer(CookieManagerLayer::new());
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_cookie_session_is_accepted() {
        let response = server()
            .get("/whoami")
            .add_header(header::COOKIE, session_cookie_header())
            .await;

        response.assert_status_ok();
        response.assert_json(&test_user());
    }

    #[tokio::test]
    async fn test_bearer_token_is_accepted() {
        let token = test_session_service().issue(&test_user()).unwrap();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", token)).unwrap();

        let response = server()
            .get("/whoami")
            .add_header(header::AUTHORIZATION, bearer)
            .await;

        response.assert_status_ok();
    }

    #[tokio::test]
    async fn test_missing_session_is_unauthorized() {
        let response = server().get("/whoami").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        response.assert_json(&serde_json::json!({ "error": "Authentication required" }));
    }

    #[tokio::test]
    async fn test_tampered_session_is_unauthorized() {
        let response = server()
            .get("/whoami")
            .add_header(header::COOKIE, HeaderValue::from_static("session=forged.token.value"))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_request_ids_are_unique() {
        let req = axum::http::Request::new(());
        let a = MakeRequestUuid.make_request_id(&req).unwrap();
        let b = MakeRequestUuid.make_request_id(&req).unwrap();
        assert_ne!(a.header_value(), b.header_value());
    }
}
