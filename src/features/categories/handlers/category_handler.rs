use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::categories::dtos::{
    CategoryListing, CategoryResponseDto, CreateCategoryDto, ReorderCategoriesDto,
    UpdateCategoryDto,
};
use crate::features::categories::services::CategoryService;
use crate::shared::types::{ApiResponse, Meta};

/// Query params for listing categories
#[derive(Debug, Deserialize)]
pub struct ListCategoriesQuery {
    /// If true, return tree structure. Default: false (flat list)
    #[serde(default)]
    pub tree: bool,
}

/// List all categories
///
/// Returns categories as flat list or tree structure based on `tree` query param.
#[utoipa::path(
    get,
    path = "/api/categories",
    params(
        ("tree" = Option<bool>, Query, description = "Return tree structure if true")
    ),
    responses(
        (status = 200, description = "Flat list, or nested forest when tree=true", body = ApiResponse<CategoryListing>),
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
    Query(query): Query<ListCategoriesQuery>,
) -> Result<Json<ApiResponse<CategoryListing>>> {
    let listing = if query.tree {
        CategoryListing::Tree(service.list_tree().await?)
    } else {
        CategoryListing::Flat(service.list().await?)
    };
    let total = listing.total() as i64;

    Ok(Json(ApiResponse::success(
        Some(listing),
        None,
        Some(Meta { total }),
    )))
}

/// Get category by id
#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(
        ("id" = i64, Path, description = "Category id")
    ),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryResponseDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let category = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// Create a category
#[utoipa::path(
    post,
    path = "/api/admin/categories",
    request_body = CreateCategoryDto,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "admin-categories",
    security(("bearer_auth" = []))
)]
pub async fn create_category(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<CategoryService>>,
    AppJson(dto): AppJson<CreateCategoryDto>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(format!("Invalid request: {}", e)))?;

    let category = service.create(dto).await?;
    tracing::info!("Category {} created by {}", category.id, user.sub);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(category), None, None)),
    ))
}

/// Update a category
#[utoipa::path(
    put,
    path = "/api/admin/categories/{id}",
    params(("id" = i64, Path, description = "Category id")),
    request_body = UpdateCategoryDto,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Category not found")
    ),
    tag = "admin-categories",
    security(("bearer_auth" = []))
)]
pub async fn update_category(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<UpdateCategoryDto>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(format!("Invalid request: {}", e)))?;

    let category = service.update(id, dto).await?;
    tracing::info!("Category {} updated by {}", id, user.sub);

    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// Reorder categories
#[utoipa::path(
    put,
    path = "/api/admin/categories/reorder",
    request_body = ReorderCategoriesDto,
    responses(
        (status = 200, description = "Categories reordered"),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Category not found")
    ),
    tag = "admin-categories",
    security(("bearer_auth" = []))
)]
pub async fn reorder_categories(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<CategoryService>>,
    AppJson(dto): AppJson<ReorderCategoriesDto>,
) -> Result<Json<ApiResponse<()>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(format!("Invalid request: {}", e)))?;

    service.reorder(dto).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Categories reordered".to_string()),
        None,
    )))
}

/// Delete a category
#[utoipa::path(
    delete,
    path = "/api/admin/categories/{id}",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Category still has websites or sub-categories")
    ),
    tag = "admin-categories",
    security(("bearer_auth" = []))
)]
pub async fn delete_category(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    tracing::info!("Category {} deleted by {}", id, user.sub);

    Ok(Json(ApiResponse::success(
        None,
        Some("Category deleted".to_string()),
        None,
    )))
}
