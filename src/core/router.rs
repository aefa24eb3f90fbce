use std::sync::Arc;

use axum::{http::StatusCode, routing::get, Router};
use sqlx::PgPool;

use crate::core::middleware;
use crate::features::auth::{routes as auth_routes, JwtValidator};
use crate::features::cache::routes as cache_routes;
use crate::features::categories::{routes as categories_routes, CategoryService};
use crate::features::home::{routes as home_routes, HomeService};
use crate::features::settings::{routes as settings_routes, SettingService};
use crate::features::tags::{routes as tags_routes, TagService};
use crate::features::websites::{routes as websites_routes, WebsiteService};
use crate::shared::cache::CacheOrchestrator;

/// Feature services sharing one pool and one cache
pub struct AppServices {
    pub categories: Arc<CategoryService>,
    pub tags: Arc<TagService>,
    pub websites: Arc<WebsiteService>,
    pub settings: Arc<SettingService>,
    pub home: Arc<HomeService>,
    pub cache: CacheOrchestrator,
}

impl AppServices {
    pub fn new(pool: PgPool, cache: CacheOrchestrator) -> Self {
        let categories = Arc::new(CategoryService::new(pool.clone(), cache.clone()));
        let tags = Arc::new(TagService::new(pool.clone(), cache.clone()));
        let websites = Arc::new(WebsiteService::new(pool.clone(), cache.clone()));
        let settings = Arc::new(SettingService::new(pool, cache.clone()));
        let home = Arc::new(HomeService::new(
            Arc::clone(&settings),
            Arc::clone(&categories),
            Arc::clone(&websites),
        ));

        Self {
            categories,
            tags,
            websites,
            settings,
            home,
            cache,
        }
    }
}

async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Public and admin API routes, without the outer HTTP layers
pub fn api_router(services: &AppServices, validator: Arc<JwtValidator>) -> Router {
    // Protected routes (require JWT authentication)
    let protected_routes = Router::new()
        .merge(auth_routes::protected_routes())
        .merge(categories_routes::admin_routes(Arc::clone(
            &services.categories,
        )))
        .merge(tags_routes::admin_routes(Arc::clone(&services.tags)))
        .merge(websites_routes::admin_routes(Arc::clone(&services.websites)))
        .merge(settings_routes::admin_routes(Arc::clone(&services.settings)))
        .merge(cache_routes::admin_routes(services.cache.clone()))
        .route_layer(axum::middleware::from_fn_with_state(
            validator,
            middleware::auth_middleware,
        ));

    // Public routes (no auth required)
    let public_routes = Router::new()
        .merge(home_routes::routes(Arc::clone(&services.home)))
        .merge(categories_routes::routes(Arc::clone(&services.categories)))
        .merge(websites_routes::routes(Arc::clone(&services.websites)))
        .merge(tags_routes::routes(Arc::clone(&services.tags)))
        .merge(settings_routes::routes(Arc::clone(&services.settings)))
        .route("/health", get(health_check));

    Router::new().merge(protected_routes).merge(public_routes)
}
