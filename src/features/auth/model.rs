use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::users::models::User;

/// The logged-in user, inserted into request extensions by the auth middleware
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Claims carried by the session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id
    pub sub: String,
    pub name: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}
