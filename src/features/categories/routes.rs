use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::categories::handlers;
use crate::features::categories::services::CategoryService;

/// Public category routes (no authentication required)
pub fn routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route("/api/categories", get(handlers::list_categories))
        .route("/api/categories/{id}", get(handlers::get_category))
        .with_state(service)
}

/// Admin category routes (require an admin token)
pub fn admin_routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route("/api/admin/categories", post(handlers::create_category))
        .route(
            "/api/admin/categories/reorder",
            put(handlers::reorder_categories),
        )
        .route(
            "/api/admin/categories/{id}",
            put(handlers::update_category).delete(handlers::delete_category),
        )
        .with_state(service)
}
