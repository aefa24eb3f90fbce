use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Database model for a key/value setting
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Setting {
    pub key: String,
    /// Raw stored text; list-valued keys hold JSON
    pub value: String,
    pub updated_at: DateTime<Utc>,
}
