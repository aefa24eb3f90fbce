use axum::{routing::delete, Router};

use crate::features::cache::handlers;
use crate::shared::cache::CacheOrchestrator;

/// Admin cache maintenance routes
pub fn admin_routes(cache: CacheOrchestrator) -> Router {
    Router::new()
        .route("/api/admin/cache/{tag}", delete(handlers::flush_cache))
        .with_state(cache)
}
