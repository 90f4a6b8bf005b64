use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;

const MISSING_REGISTER_FIELDS: &str = "Name, email and password required";

/// Request DTO for user registration
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequestDto {
    #[validate(length(max = 120, message = "Name must be at most 120 characters"))]
    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,

    #[validate(
        email(message = "Invalid email format"),
        length(max = 120, message = "Email must be at most 120 characters")
    )]
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,

    pub password: Option<String>,
}

/// Registration fields after presence checks
#[derive(Debug)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequestDto {
    /// All three fields must be present and non-empty, then pass format checks
    pub fn into_new_account(self) -> Result<NewAccount, AppError> {
        let present = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.is_empty());
        if !present(&self.name) || !present(&self.email) || !present(&self.password) {
            return Err(AppError::Validation(MISSING_REGISTER_FIELDS.to_string()));
        }

        self.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        match (self.name, self.email, self.password) {
            (Some(name), Some(email), Some(password)) => Ok(NewAccount {
                name,
                email,
                password,
            }),
            _ => Err(AppError::Validation(MISSING_REGISTER_FIELDS.to_string())),
        }
    }
}

/// Request DTO for user login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequestDto {
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    pub password: Option<String>,
}

/// User info included in the login response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthUserDto {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<AuthenticatedUser> for AuthUserDto {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// Response DTO for login; the session itself travels in the `session` cookie
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponseDto {
    #[schema(example = "Logged in successfully")]
    pub message: String,
    pub user: AuthUserDto,
}
