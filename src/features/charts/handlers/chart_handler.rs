use axum::{extract::State, Json};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::core::error::Result;
use crate::core::extractor::AppPath;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::charts::dtos::SuggestionsResponseDto;
use crate::features::charts::services::ChartService;
use crate::shared::types::ErrorResponse;

/// Suggest charts for a file based on its column types
#[utoipa::path(
    get,
    path = "/charts/suggest/{file_id}",
    tag = "charts",
    params(
        ("file_id" = i64, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "Chart suggestions", body = SuggestionsResponseDto),
        (status = 400, description = "File could not be parsed", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    ),
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    )
)]
pub async fn suggest_charts(
    user: AuthenticatedUser,
    State(service): State<Arc<ChartService>>,
    AppPath(file_id): AppPath<i64>,
) -> Result<Json<SuggestionsResponseDto>> {
    let response = service.suggest(file_id, user.id).await?;
    Ok(Json(response))
}

/// Full file contents, column by column
///
/// NaN and infinite values are returned as null.
#[utoipa::path(
    get,
    path = "/charts/data/{file_id}",
    tag = "charts",
    params(
        ("file_id" = i64, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "Column name to list of values"),
        (status = 400, description = "File could not be parsed", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    ),
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    )
)]
pub async fn chart_data(
    user: AuthenticatedUser,
    State(service): State<Arc<ChartService>>,
    AppPath(file_id): AppPath<i64>,
) -> Result<Json<Map<String, Value>>> {
    let data = service.data(file_id, user.id).await?;
    Ok(Json(data))
}
