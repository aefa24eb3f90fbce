use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for a listed website
#[derive(Debug, Clone, FromRow)]
pub struct Website {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub description: String,
    pub category_id: i64,
    pub display_order: i32,
    pub is_recommended: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Join row linking a website to a tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct WebsiteTag {
    pub website_id: i64,
    pub tag_id: i64,
}
