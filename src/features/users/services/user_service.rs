use sqlx::PgPool;
use tracing::info;

use crate::core::error::{AppError, Result};
use crate::features::users::models::User;

/// Convert database error to a user-facing error where the cause is known
fn handle_db_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        // Unique constraint violation on users.email
        if db_err.is_unique_violation() {
            return AppError::Validation("Email already registered".to_string());
        }
    }

    AppError::Database(e)
}

/// Service for user account persistence
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Insert a new account. A taken email fails with a validation error.
    pub async fn create(&self, name: &str, email: &str, password_hash: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(handle_db_error)?;

        info!("User registered: id={}", user.id);
        Ok(user)
    }
}
