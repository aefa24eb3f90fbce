use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::tags::dtos::{CreateTagDto, TagOrder, TagWithCountDto, UpdateTagDto};
use crate::features::tags::services::TagService;
use crate::shared::types::{ApiResponse, Meta};

fn list_response(tags: Vec<TagWithCountDto>) -> Json<ApiResponse<Vec<TagWithCountDto>>> {
    let total = tags.len() as i64;
    Json(ApiResponse::success(Some(tags), None, Some(Meta { total })))
}

/// List tags by name with website counts
#[utoipa::path(
    get,
    path = "/api/tags",
    responses(
        (status = 200, description = "Tags ordered by name", body = ApiResponse<Vec<TagWithCountDto>>),
    ),
    tag = "tags"
)]
pub async fn list_tags(
    State(service): State<Arc<TagService>>,
) -> Result<Json<ApiResponse<Vec<TagWithCountDto>>>> {
    let tags = service.list(TagOrder::NameAsc).await?;
    Ok(list_response(tags))
}

/// List tags newest first (admin view)
#[utoipa::path(
    get,
    path = "/api/admin/tags",
    responses(
        (status = 200, description = "Tags ordered by creation time, newest first", body = ApiResponse<Vec<TagWithCountDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "admin-tags",
    security(("bearer_auth" = []))
)]
pub async fn list_admin_tags(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<TagService>>,
) -> Result<Json<ApiResponse<Vec<TagWithCountDto>>>> {
    let tags = service.list(TagOrder::CreatedDesc).await?;
    Ok(list_response(tags))
}

/// Create a tag
#[utoipa::path(
    post,
    path = "/api/admin/tags",
    request_body = CreateTagDto,
    responses(
        (status = 201, description = "Tag created", body = ApiResponse<TagWithCountDto>),
        (status = 400, description = "Validation error or duplicate name"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "admin-tags",
    security(("bearer_auth" = []))
)]
pub async fn create_tag(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<TagService>>,
    AppJson(dto): AppJson<CreateTagDto>,
) -> Result<(StatusCode, Json<ApiResponse<TagWithCountDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(format!("Invalid request: {}", e)))?;

    let tag = service.create(dto).await?;
    tracing::info!("Tag '{}' ({}) created by {}", tag.name, tag.id, user.sub);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(tag), None, None)),
    ))
}

/// Update a tag
#[utoipa::path(
    put,
    path = "/api/admin/tags/{id}",
    params(("id" = i64, Path, description = "Tag id")),
    request_body = UpdateTagDto,
    responses(
        (status = 200, description = "Tag updated", body = ApiResponse<TagWithCountDto>),
        (status = 400, description = "Validation error or duplicate name"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Tag not found")
    ),
    tag = "admin-tags",
    security(("bearer_auth" = []))
)]
pub async fn update_tag(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<TagService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<UpdateTagDto>,
) -> Result<Json<ApiResponse<TagWithCountDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(format!("Invalid request: {}", e)))?;

    let tag = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(tag), None, None)))
}

/// Delete a tag
#[utoipa::path(
    delete,
    path = "/api/admin/tags/{id}",
    params(("id" = i64, Path, description = "Tag id")),
    responses(
        (status = 200, description = "Tag deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Tag not found")
    ),
    tag = "admin-tags",
    security(("bearer_auth" = []))
)]
pub async fn delete_tag(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<TagService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    tracing::info!("Tag {} deleted by {}", id, user.sub);

    Ok(Json(ApiResponse::success(
        None,
        Some("Tag deleted".to_string()),
        None,
    )))
}
