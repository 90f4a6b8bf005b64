use axum::{extract::State, Json};
use std::sync::Arc;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppPath};
use crate::features::ai::dtos::{ChatRequestDto, ChatResponseDto, SummaryResponseDto};
use crate::features::ai::services::AiService;
use crate::features::auth::model::AuthenticatedUser;
use crate::shared::types::ErrorResponse;

/// Generate a markdown summary of a file
#[utoipa::path(
    get,
    path = "/ai/summary/{file_id}",
    tag = "ai",
    params(
        ("file_id" = i64, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "Summary generated", body = SummaryResponseDto),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 500, description = "AI service unavailable or failed", body = ErrorResponse)
    ),
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    )
)]
pub async fn get_summary(
    user: AuthenticatedUser,
    State(service): State<Arc<AiService>>,
    AppPath(file_id): AppPath<i64>,
) -> Result<Json<SummaryResponseDto>> {
    let summary = service.summary(file_id, user.id).await?;
    Ok(Json(SummaryResponseDto { summary }))
}

/// Chat about a file
///
/// The conversation is stateless: send the full history with every request.
#[utoipa::path(
    post,
    path = "/ai/chat",
    tag = "ai",
    request_body = ChatRequestDto,
    responses(
        (status = 200, description = "Assistant reply", body = ChatResponseDto),
        (status = 400, description = "Missing file_id or messages", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 500, description = "AI service unavailable or failed", body = ErrorResponse)
    ),
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    )
)]
pub async fn chat(
    user: AuthenticatedUser,
    State(service): State<Arc<AiService>>,
    AppJson(dto): AppJson<ChatRequestDto>,
) -> Result<Json<ChatResponseDto>> {
    let (file_id, messages) = dto.into_parts()?;
    let reply = service.chat(file_id, user.id, messages).await?;
    Ok(Json(ChatResponseDto { reply }))
}

#[cfg(test)]
mod tests {
    use crate::features::ai::routes;
    use crate::shared::test_helpers::{ai_service, session_cookie_header, with_session_auth};
    use axum::http::{header, StatusCode};
    use axum_test::TestServer;
    use serde_json::json;
    use tempfile::TempDir;
    use tower_cookies::CookieManagerLayer;

    async fn server() -> (TempDir, TestServer) {
        let (dir, service) = ai_service().await;
        let app = with_session_auth(routes(service)).layer(CookieManagerLayer::new());
        (dir, TestServer::new(app).unwrap())
    }

    #[tokio::test]
    async fn test_chat_requires_file_id_and_messages() {
        let (_dir, server) = server().await;
        let response = server
            .post("/ai/chat")
            .add_header(header::COOKIE, session_cookie_header())
            .json(&json!({ "file_id": 1, "messages": [] }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "error": "Missing file_id or messages" }));
    }

    #[tokio::test]
    async fn test_chat_requires_session() {
        let (_dir, server) = server().await;
        let response = server
            .post("/ai/chat")
            .json(&json!({ "file_id": 1, "messages": [{ "role": "user", "content": "hi" }] }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_summary_requires_session() {
        let (_dir, server) = server().await;
        server
            .get("/ai/summary/1")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_summary_rejects_non_numeric_id() {
        let (_dir, server) = server().await;
        let response = server
            .get("/ai/summary/first")
            .add_header(header::COOKIE, session_cookie_header())
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
