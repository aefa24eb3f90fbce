use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::websites::dtos::{
    CreateWebsiteDto, RecommendedWebsitesView, UpdateWebsiteDto, WebsiteResponseDto,
};
use crate::features::websites::services::WebsiteService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// Recommended websites
#[utoipa::path(
    get,
    path = "/api/websites/recommended",
    responses(
        (status = 200, description = "Recommended websites ordered by position", body = ApiResponse<RecommendedWebsitesView>),
    ),
    tag = "websites"
)]
pub async fn list_recommended_websites(
    State(service): State<Arc<WebsiteService>>,
) -> Result<Json<ApiResponse<RecommendedWebsitesView>>> {
    let view = service.recommended().await?;
    let total = view.count as i64;
    Ok(Json(ApiResponse::success(
        Some(view),
        None,
        Some(Meta { total }),
    )))
}

/// Websites of one category
#[utoipa::path(
    get,
    path = "/api/categories/{id}/websites",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "Websites in the category", body = ApiResponse<Vec<WebsiteResponseDto>>),
        (status = 404, description = "Category not found")
    ),
    tag = "websites"
)]
pub async fn list_category_websites(
    State(service): State<Arc<WebsiteService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<WebsiteResponseDto>>>> {
    let websites = service.fetch_by_category(id).await?;
    let total = websites.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(websites),
        None,
        Some(Meta { total }),
    )))
}

/// List websites (admin, paginated)
#[utoipa::path(
    get,
    path = "/api/admin/websites",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Websites, newest first", body = ApiResponse<Vec<WebsiteResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "admin-websites",
    security(("bearer_auth" = []))
)]
pub async fn list_websites(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<WebsiteService>>,
    Query(params): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<WebsiteResponseDto>>>> {
    let (websites, total) = service.list(&params).await?;
    Ok(Json(ApiResponse::success(
        Some(websites),
        None,
        Some(Meta { total }),
    )))
}

/// Get website by id (admin)
#[utoipa::path(
    get,
    path = "/api/admin/websites/{id}",
    params(("id" = i64, Path, description = "Website id")),
    responses(
        (status = 200, description = "Website found", body = ApiResponse<WebsiteResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Website not found")
    ),
    tag = "admin-websites",
    security(("bearer_auth" = []))
)]
pub async fn get_website(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<WebsiteService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<WebsiteResponseDto>>> {
    let website = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(website), None, None)))
}

/// Create a website
#[utoipa::path(
    post,
    path = "/api/admin/websites",
    request_body = CreateWebsiteDto,
    responses(
        (status = 201, description = "Website created", body = ApiResponse<WebsiteResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "admin-websites",
    security(("bearer_auth" = []))
)]
pub async fn create_website(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<WebsiteService>>,
    AppJson(dto): AppJson<CreateWebsiteDto>,
) -> Result<(StatusCode, Json<ApiResponse<WebsiteResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(format!("Invalid request: {}", e)))?;

    let website = service.create(dto).await?;
    tracing::info!("Website {} created by {}", website.id, user.sub);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(website), None, None)),
    ))
}

/// Update a website
#[utoipa::path(
    put,
    path = "/api/admin/websites/{id}",
    params(("id" = i64, Path, description = "Website id")),
    request_body = UpdateWebsiteDto,
    responses(
        (status = 200, description = "Website updated", body = ApiResponse<WebsiteResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Website not found")
    ),
    tag = "admin-websites",
    security(("bearer_auth" = []))
)]
pub async fn update_website(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<WebsiteService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<UpdateWebsiteDto>,
) -> Result<Json<ApiResponse<WebsiteResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(format!("Invalid request: {}", e)))?;

    let website = service.update(id, dto).await?;
    tracing::info!("Website {} updated by {}", id, user.sub);

    Ok(Json(ApiResponse::success(Some(website), None, None)))
}

/// Delete a website
#[utoipa::path(
    delete,
    path = "/api/admin/websites/{id}",
    params(("id" = i64, Path, description = "Website id")),
    responses(
        (status = 200, description = "Website deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Website not found")
    ),
    tag = "admin-websites",
    security(("bearer_auth" = []))
)]
pub async fn delete_website(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<WebsiteService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    tracing::info!("Website {} deleted by {}", id, user.sub);

    Ok(Json(ApiResponse::success(
        None,
        Some("Website deleted".to_string()),
        None,
    )))
}
