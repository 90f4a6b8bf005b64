use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for registered users
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Argon2 PHC string
    pub password: String,
    #[allow(dead_code)]
    pub created_at: DateTime<Utc>,
}
