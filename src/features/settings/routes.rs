use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::settings::handlers;
use crate::features::settings::services::SettingService;

/// Public settings routes
pub fn routes(service: Arc<SettingService>) -> Router {
    Router::new()
        .route("/api/settings/home", get(handlers::get_home_settings))
        .with_state(service)
}

/// Admin settings routes
pub fn admin_routes(service: Arc<SettingService>) -> Router {
    Router::new()
        .route(
            "/api/admin/settings",
            get(handlers::list_settings).put(handlers::upsert_setting),
        )
        .with_state(service)
}
