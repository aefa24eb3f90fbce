use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::cache::{dtos as cache_dtos, handlers as cache_handlers};
use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::home::{dtos as home_dtos, handlers as home_handlers};
use crate::features::settings::{
    dtos as settings_dtos, handlers as settings_handlers, models as settings_models,
};
use crate::features::tags::{dtos as tags_dtos, handlers as tags_handlers};
use crate::features::websites::{dtos as websites_dtos, handlers as websites_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handler::get_me,
        // Home (public)
        home_handlers::get_home,
        // Categories
        categories_handlers::list_categories,
        categories_handlers::get_category,
        categories_handlers::create_category,
        categories_handlers::update_category,
        categories_handlers::reorder_categories,
        categories_handlers::delete_category,
        // Websites
        websites_handlers::list_recommended_websites,
        websites_handlers::list_category_websites,
        websites_handlers::list_websites,
        websites_handlers::get_website,
        websites_handlers::create_website,
        websites_handlers::update_website,
        websites_handlers::delete_website,
        // Tags
        tags_handlers::list_tags,
        tags_handlers::list_admin_tags,
        tags_handlers::create_tag,
        tags_handlers::update_tag,
        tags_handlers::delete_tag,
        // Settings
        settings_handlers::get_home_settings,
        settings_handlers::list_settings,
        settings_handlers::upsert_setting,
        // Cache
        cache_handlers::flush_cache,
    ),
    components(
        schemas(
            Meta,
            // Auth
            auth::dto::MeResponseDto,
            ApiResponse<auth::dto::MeResponseDto>,
            // Categories
            categories_dtos::CategoryResponseDto,
            categories_dtos::CategoryNode,
            categories_dtos::CategoryListing,
            categories_dtos::CreateCategoryDto,
            categories_dtos::UpdateCategoryDto,
            categories_dtos::CategoryOrderDto,
            categories_dtos::ReorderCategoriesDto,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            ApiResponse<categories_dtos::CategoryListing>,
            // Websites
            websites_dtos::CategoryRefDto,
            websites_dtos::RecommendedWebsiteDto,
            websites_dtos::RecommendedWebsitesView,
            websites_dtos::WebsiteResponseDto,
            websites_dtos::CreateWebsiteDto,
            websites_dtos::UpdateWebsiteDto,
            ApiResponse<websites_dtos::RecommendedWebsitesView>,
            ApiResponse<websites_dtos::WebsiteResponseDto>,
            ApiResponse<Vec<websites_dtos::WebsiteResponseDto>>,
            // Tags
            tags_dtos::TagWithCountDto,
            tags_dtos::CreateTagDto,
            tags_dtos::UpdateTagDto,
            ApiResponse<tags_dtos::TagWithCountDto>,
            ApiResponse<Vec<tags_dtos::TagWithCountDto>>,
            // Settings
            settings_models::Setting,
            settings_dtos::CustomLinkDto,
            settings_dtos::HomeSettingsView,
            settings_dtos::UpsertSettingDto,
            ApiResponse<settings_dtos::HomeSettingsView>,
            ApiResponse<settings_models::Setting>,
            ApiResponse<Vec<settings_models::Setting>>,
            // Home
            home_dtos::HomeView,
            ApiResponse<home_dtos::HomeView>,
            // Cache
            cache_dtos::CacheFlushDto,
            ApiResponse<cache_dtos::CacheFlushDto>,
        )
    ),
    tags(
        (name = "auth", description = "Current admin identity"),
        (name = "home", description = "Home page bundle (public)"),
        (name = "categories", description = "Category list and tree (public)"),
        (name = "websites", description = "Website listings (public)"),
        (name = "tags", description = "Tags with usage counts (public)"),
        (name = "settings", description = "Home page settings (public)"),
        (name = "admin-categories", description = "Category management (admin only)"),
        (name = "admin-websites", description = "Website management (admin only)"),
        (name = "admin-tags", description = "Tag management (admin only)"),
        (name = "admin-settings", description = "Settings management (admin only)"),
        (name = "admin-cache", description = "Cached view maintenance (admin only)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Website Directory API",
        version = "0.1.0",
        description = "API documentation for the website directory",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
