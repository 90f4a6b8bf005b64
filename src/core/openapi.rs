use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::ai::{dtos as ai_dtos, handlers as ai_handlers};
use crate::features::auth::{dtos as auth_dtos, handlers as auth_handlers};
use crate::features::charts::{dtos as charts_dtos, handlers as charts_handlers};
use crate::features::files::{dtos as files_dtos, handlers as files_handlers};
use crate::modules::llm::ChatMessage;
use crate::shared::constants::SESSION_COOKIE_NAME;
use crate::shared::tabular::FileMetadata;
use crate::shared::types::{ErrorResponse, MessageResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth_handlers::register,
        auth_handlers::login,
        auth_handlers::logout,
        // Files
        files_handlers::upload_file,
        files_handlers::list_files,
        files_handlers::delete_file,
        // Charts
        charts_handlers::suggest_charts,
        charts_handlers::chart_data,
        // AI
        ai_handlers::get_summary,
        ai_handlers::chat,
    ),
    components(
        schemas(
            ErrorResponse,
            MessageResponse,
            FileMetadata,
            ChatMessage,
            auth_dtos::RegisterRequestDto,
            auth_dtos::LoginRequestDto,
            auth_dtos::LoginResponseDto,
            auth_dtos::AuthUserDto,
            files_dtos::UploadFileDto,
            files_dtos::UploadResponseDto,
            files_dtos::FileResponseDto,
            charts_dtos::ChartSuggestion,
            charts_dtos::SuggestionsResponseDto,
            ai_dtos::SummaryResponseDto,
            ai_dtos::ChatRequestDto,
            ai_dtos::ChatResponseDto,
        )
    ),
    tags(
        (name = "auth", description = "Registration and cookie sessions"),
        (name = "files", description = "Upload and manage tabular files"),
        (name = "charts", description = "Chart suggestions and chart data"),
        (name = "ai", description = "LLM summaries and chat about a file"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Ailytix API",
        version = "0.1.0",
        description = "API documentation for Ailytix",
    )
)]
pub struct ApiDoc;

/// Adds the session cookie and Bearer security schemes to the OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE_NAME))),
            );
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_endpoint_is_documented() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for path in [
            "/auth/register",
            "/auth/login",
            "/auth/logout",
            "/files/upload",
            "/files/list",
            "/files/delete/{file_id}",
            "/charts/suggest/{file_id}",
            "/charts/data/{file_id}",
            "/ai/summary/{file_id}",
            "/ai/chat",
        ] {
            assert!(paths.contains(&path), "missing {}", path);
        }
    }

    #[test]
    fn test_security_schemes_are_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("session_cookie"));
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }

    #[test]
    fn test_info_modifier_overrides_title() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Custom".to_string(),
            version: "9.9.9".to_string(),
            description: "desc".to_string(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.title, "Custom");
        assert_eq!(doc.info.version, "9.9.9");
    }
}
