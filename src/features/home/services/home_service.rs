use std::sync::Arc;

use crate::core::error::Result;
use crate::features::categories::CategoryService;
use crate::features::home::dtos::{select_sidebar, HomeView};
use crate::features::settings::SettingService;
use crate::features::websites::WebsiteService;

/// Combines the cached views behind the home page
pub struct HomeService {
    settings: Arc<SettingService>,
    categories: Arc<CategoryService>,
    websites: Arc<WebsiteService>,
}

impl HomeService {
    pub fn new(
        settings: Arc<SettingService>,
        categories: Arc<CategoryService>,
        websites: Arc<WebsiteService>,
    ) -> Self {
        Self {
            settings,
            categories,
            websites,
        }
    }

    pub async fn home(&self) -> Result<HomeView> {
        let settings = self.settings.home().await?;
        let tree = self.categories.list_tree().await?;
        let categories = select_sidebar(tree, &settings.sidebar_categories);

        let recommended = if settings.show_recommended {
            Some(self.websites.recommended().await?)
        } else {
            None
        };

        Ok(HomeView {
            settings,
            categories,
            recommended,
        })
    }
}
