use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{LoginRequestDto, LoginResponseDto, RegisterRequestDto};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::AuthService;
use crate::shared::types::{ErrorResponse, MessageResponse};
use axum::{extract::State, Json};
use std::sync::Arc;
use tower_cookies::Cookies;

/// Register a new user
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequestDto,
    responses(
        (status = 200, description = "User registered successfully", body = MessageResponse),
        (status = 400, description = "Missing fields or email already registered", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<RegisterRequestDto>,
) -> Result<Json<MessageResponse>> {
    service.register(dto).await?;
    Ok(Json(MessageResponse::new("User registered successfully")))
}

/// Login with email and password
///
/// Sets the `session` cookie on success.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Login successful", body = LoginResponseDto),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(service): State<Arc<AuthService>>,
    cookies: Cookies,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Result<Json<LoginResponseDto>> {
    let outcome = service.login(dto).await?;
    cookies.add(service.sessions().session_cookie(outcome.token));

    Ok(Json(LoginResponseDto {
        message: "Logged in successfully".to_string(),
        user: outcome.user,
    }))
}

/// Log out the current user by clearing the session cookie
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    ),
    tag = "auth",
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    )
)]
pub async fn logout(
    user: AuthenticatedUser,
    State(service): State<Arc<AuthService>>,
    cookies: Cookies,
) -> Result<Json<MessageResponse>> {
    cookies.remove(service.sessions().removal_cookie());
    tracing::info!("User logged out: id={}", user.id);
    Ok(Json(MessageResponse::new("Logged out successfully")))
}

#[cfg(test)]
mod tests {
    use crate::features::auth::routes::{protected_routes, public_routes};
    use crate::shared::test_helpers::{
        auth_service, session_cookie_header, with_session_auth,
    };
    use axum::http::{header, StatusCode};
    use axum::Router;
    use axum_test::TestServer;
    use serde_json::json;
    use tower_cookies::CookieManagerLayer;

    fn server() -> TestServer {
        let service = auth_service();
        let app = Router::new()
            .merge(public_routes(service.clone()))
            .merge(with_session_auth(protected_routes(service)))
            .layer(CookieManagerLayer::new());
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_register_requires_all_fields() {
        let response = server()
            .post("/auth/register")
            .json(&json!({ "email": "ada@example.com", "password": "pw" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "error": "Name, email and password required" }));
    }

    #[tokio::test]
    async fn test_register_rejects_malformed_json() {
        let response = server()
            .post("/auth/register")
            .content_type("application/json")
            .text("{not json")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.json::<serde_json::Value>()["error"].is_string());
    }

    #[tokio::test]
    async fn test_login_without_credentials_is_unauthorized() {
        let response = server().post("/auth/login").json(&json!({})).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        response.assert_json(&json!({ "error": "Invalid credentials" }));
    }

    #[tokio::test]
    async fn test_logout_requires_session() {
        let response = server().post("/auth/logout").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logout_clears_cookie() {
        let response = server()
            .post("/auth/logout")
            .add_header(header::COOKIE, session_cookie_header())
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({ "message": "Logged out successfully" }));

        let set_cookie = response.header(header::SET_COOKIE);
        let set_cookie = set_cookie.to_str().unwrap();
        assert!(set_cookie.starts_with("session="));
        assert!(set_cookie.contains("Max-Age=0"));
    }
}
