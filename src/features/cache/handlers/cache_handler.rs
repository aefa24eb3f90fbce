use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::error::{AppError, Result};
use crate::features::auth::guards::RequireAdmin;
use crate::features::cache::dtos::CacheFlushDto;
use crate::shared::cache::{CacheOrchestrator, CacheTag};
use crate::shared::types::ApiResponse;

/// Drop every cached view grouped under an entity tag
///
/// Unlike the invalidation that follows a write, a failing cache store is
/// reported to the caller here.
#[utoipa::path(
    delete,
    path = "/api/admin/cache/{tag}",
    params(("tag" = String, Path, description = "One of: categories, websites, tags, settings")),
    responses(
        (status = 200, description = "Views dropped", body = ApiResponse<CacheFlushDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Unknown cache tag"),
        (status = 500, description = "Cache store unavailable")
    ),
    tag = "admin-cache",
    security(("bearer_auth" = []))
)]
pub async fn flush_cache(
    RequireAdmin(user): RequireAdmin,
    State(cache): State<CacheOrchestrator>,
    Path(tag): Path<String>,
) -> Result<Json<ApiResponse<CacheFlushDto>>> {
    let tag = CacheTag::from_name(&tag)
        .ok_or_else(|| AppError::NotFound(format!("Unknown cache tag '{}'", tag)))?;

    cache.invalidate_by_tag(tag, None).await?;
    tracing::info!("Cache tag '{}' flushed by {}", tag, user.sub);

    Ok(Json(ApiResponse::success(
        Some(CacheFlushDto::from(tag)),
        Some("Cache flushed".to_string()),
        None,
    )))
}
