use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for category
///
/// `parent_id` links categories into a forest. Storage does not enforce
/// acyclicity; writes through `CategoryService` refuse to create cycles.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub name: String,
    pub display_order: i32,
    pub icon_url: Option<String>,
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Category row joined with the number of websites filed under it
#[derive(Debug, Clone, FromRow)]
pub struct CategoryWithCount {
    #[sqlx(flatten)]
    pub category: Category,
    pub website_count: i64,
}
