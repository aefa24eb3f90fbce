use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use crate::features::tags::handlers;
use crate::features::tags::services::TagService;

/// Public tag routes
pub fn routes(service: Arc<TagService>) -> Router {
    Router::new()
        .route("/api/tags", get(handlers::list_tags))
        .with_state(service)
}

/// Admin tag routes
pub fn admin_routes(service: Arc<TagService>) -> Router {
    Router::new()
        .route(
            "/api/admin/tags",
            get(handlers::list_admin_tags).post(handlers::create_tag),
        )
        .route(
            "/api/admin/tags/{id}",
            put(handlers::update_tag).delete(handlers::delete_tag),
        )
        .with_state(service)
}
