use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::features::home::dtos::HomeView;
use crate::features::home::services::HomeService;
use crate::shared::types::ApiResponse;

/// Home page bundle: settings, sidebar categories and recommended websites
#[utoipa::path(
    get,
    path = "/api/home",
    responses(
        (status = 200, description = "Home page data", body = ApiResponse<HomeView>),
        (status = 500, description = "A stored list setting is malformed")
    ),
    tag = "home"
)]
pub async fn get_home(State(service): State<Arc<HomeService>>) -> Result<Json<ApiResponse<HomeView>>> {
    let view = service.home().await?;
    Ok(Json(ApiResponse::success(Some(view), None, None)))
}
