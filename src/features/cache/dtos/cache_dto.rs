use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::cache::CacheTag;

/// Views dropped by a manual flush
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CacheFlushDto {
    pub tag: String,
    pub keys: Vec<String>,
}

impl From<CacheTag> for CacheFlushDto {
    fn from(tag: CacheTag) -> Self {
        Self {
            tag: tag.name().to_string(),
            keys: tag.keys().iter().map(|k| k.as_str().to_string()).collect(),
        }
    }
}
