use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for tag
#[derive(Debug, Clone, FromRow)]
pub struct Tag {
    pub id: i64,
    /// Unique, stored trimmed
    pub name: String,
    pub color: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
