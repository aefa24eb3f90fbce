//! Cache key namespace.
//!
//! Each aggregate view is cached whole under one fixed key. Tags group the
//! keys that depend on one kind of entity so writes can drop them together.

/// Fixed key of a cached aggregate view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Category forest with website counts
    CategoryTree,
    /// Flat category list with website counts
    CategoryList,
    /// Recommended websites with their category reference
    RecommendedWebsites,
    /// Tags with usage counts, name ascending (public listing)
    TagsByName,
    /// Tags with usage counts, newest first (admin listing)
    TagsByCreated,
    /// Home settings bundle
    HomeSettings,
}

impl CacheKey {
    #[cfg(test)]
    pub const ALL: [CacheKey; 6] = [
        CacheKey::CategoryTree,
        CacheKey::CategoryList,
        CacheKey::RecommendedWebsites,
        CacheKey::TagsByName,
        CacheKey::TagsByCreated,
        CacheKey::HomeSettings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKey::CategoryTree => "categories:tree",
            CacheKey::CategoryList => "categories:flat",
            CacheKey::RecommendedWebsites => "websites:recommended",
            CacheKey::TagsByName => "tags:by_name",
            CacheKey::TagsByCreated => "tags:by_created",
            CacheKey::HomeSettings => "settings:home",
        }
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Invalidation group, named after the entity whose writes it covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheTag {
    Categories,
    Websites,
    Tags,
    Settings,
}

impl CacheTag {
    pub const ALL: [CacheTag; 4] = [
        CacheTag::Categories,
        CacheTag::Websites,
        CacheTag::Tags,
        CacheTag::Settings,
    ];

    /// Look a tag up by its [`name`](Self::name)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            CacheTag::Categories => "categories",
            CacheTag::Websites => "websites",
            CacheTag::Tags => "tags",
            CacheTag::Settings => "settings",
        }
    }

    /// Keys whose aggregate reads rows of this entity
    pub fn keys(&self) -> &'static [CacheKey] {
        match self {
            // Recommended websites embed the category name
            CacheTag::Categories => &[
                CacheKey::CategoryTree,
                CacheKey::CategoryList,
                CacheKey::RecommendedWebsites,
            ],
            // Website rows feed category counts and tag usage counts
            CacheTag::Websites => &[
                CacheKey::RecommendedWebsites,
                CacheKey::CategoryTree,
                CacheKey::CategoryList,
                CacheKey::TagsByName,
                CacheKey::TagsByCreated,
            ],
            CacheTag::Tags => &[CacheKey::TagsByName, CacheKey::TagsByCreated],
            CacheTag::Settings => &[CacheKey::HomeSettings],
        }
    }
}

impl std::fmt::Display for CacheTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
