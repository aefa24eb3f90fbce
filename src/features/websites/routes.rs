use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::websites::handlers;
use crate::features::websites::services::WebsiteService;

/// Public website routes
pub fn routes(service: Arc<WebsiteService>) -> Router {
    Router::new()
        .route(
            "/api/websites/recommended",
            get(handlers::list_recommended_websites),
        )
        .route(
            "/api/categories/{id}/websites",
            get(handlers::list_category_websites),
        )
        .with_state(service)
}

/// Admin website routes
pub fn admin_routes(service: Arc<WebsiteService>) -> Router {
    Router::new()
        .route(
            "/api/admin/websites",
            get(handlers::list_websites).post(handlers::create_website),
        )
        .route(
            "/api/admin/websites/{id}",
            get(handlers::get_website)
                .put(handlers::update_website)
                .delete(handlers::delete_website),
        )
        .with_state(service)
}
