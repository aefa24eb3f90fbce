use std::sync::Arc;

use axum::{extract::State, Json};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::settings::dtos::{HomeSettingsView, UpsertSettingDto};
use crate::features::settings::models::Setting;
use crate::features::settings::services::SettingService;
use crate::shared::types::{ApiResponse, Meta};

/// Home page settings with defaults applied
#[utoipa::path(
    get,
    path = "/api/settings/home",
    responses(
        (status = 200, description = "Home settings", body = ApiResponse<HomeSettingsView>),
        (status = 500, description = "A stored list setting is malformed")
    ),
    tag = "settings"
)]
pub async fn get_home_settings(
    State(service): State<Arc<SettingService>>,
) -> Result<Json<ApiResponse<HomeSettingsView>>> {
    let view = service.home().await?;
    Ok(Json(ApiResponse::success(Some(view), None, None)))
}

/// List all stored settings
#[utoipa::path(
    get,
    path = "/api/admin/settings",
    responses(
        (status = 200, description = "Stored settings", body = ApiResponse<Vec<Setting>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "admin-settings",
    security(("bearer_auth" = []))
)]
pub async fn list_settings(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<SettingService>>,
) -> Result<Json<ApiResponse<Vec<Setting>>>> {
    let settings = service.list_all().await?;
    let total = settings.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(settings),
        None,
        Some(Meta { total }),
    )))
}

/// Insert or overwrite a setting
#[utoipa::path(
    put,
    path = "/api/admin/settings",
    request_body = UpsertSettingDto,
    responses(
        (status = 200, description = "Setting stored", body = ApiResponse<Setting>),
        (status = 400, description = "Invalid key or value"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "admin-settings",
    security(("bearer_auth" = []))
)]
pub async fn upsert_setting(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<SettingService>>,
    AppJson(dto): AppJson<UpsertSettingDto>,
) -> Result<Json<ApiResponse<Setting>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(format!("Invalid request: {}", e)))?;

    let setting = service.upsert(dto).await?;
    tracing::info!("Setting '{}' updated by {}", setting.key, user.sub);

    Ok(Json(ApiResponse::success(Some(setting), None, None)))
}
