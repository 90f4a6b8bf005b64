use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Stored question/answer pair about a file
#[derive(Debug, Clone, FromRow)]
#[allow(dead_code)]
pub struct Chat {
    pub id: i64,
    pub file_id: i64,
    pub user_id: i64,
    pub question: String,
    pub answer: String,
    pub timestamp: DateTime<Utc>,
}
