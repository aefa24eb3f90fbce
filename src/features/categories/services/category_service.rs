use std::collections::{HashMap, HashSet};

use sqlx::PgPool;

use crate::core::error::{handle_db_error, AppError, Result};
use crate::features::categories::dtos::{
    CategoryNode, CategoryResponseDto, CreateCategoryDto, ReorderCategoriesDto, UpdateCategoryDto,
};
use crate::features::categories::models::{Category, CategoryWithCount};
use crate::shared::cache::{CacheKey, CacheOrchestrator, CacheTag};

const CATEGORY_WITH_COUNT_SELECT: &str = r#"
    SELECT c.id, c.parent_id, c.name, c.display_order, c.icon_url, c.icon,
           c.created_at, c.updated_at,
           COUNT(w.id) AS website_count
    FROM categories c
    LEFT JOIN websites w ON w.category_id = c.id
"#;

/// True when re-parenting `id` under `new_parent` would close a loop.
///
/// Walks the ancestor chain of `new_parent` in `parents` (id -> parent id).
/// The walk is bounded so already-corrupt data cannot hang it.
fn would_create_cycle(parents: &HashMap<i64, Option<i64>>, id: i64, new_parent: i64) -> bool {
    let mut seen = HashSet::new();
    let mut current = Some(new_parent);
    while let Some(ancestor) = current {
        if ancestor == id {
            return true;
        }
        if !seen.insert(ancestor) {
            // pre-existing loop that does not pass through `id`
            return false;
        }
        current = parents.get(&ancestor).copied().flatten();
    }
    false
}

/// Service for category operations
pub struct CategoryService {
    pool: PgPool,
    cache: CacheOrchestrator,
}

impl CategoryService {
    pub fn new(pool: PgPool, cache: CacheOrchestrator) -> Self {
        Self { pool, cache }
    }

    /// All categories with website counts, ordered by `display_order`
    pub async fn fetch_rows(&self) -> Result<Vec<CategoryWithCount>> {
        let query = format!(
            "{} GROUP BY c.id ORDER BY c.display_order, c.id",
            CATEGORY_WITH_COUNT_SELECT
        );

        sqlx::query_as::<_, CategoryWithCount>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list categories: {:?}", e);
                AppError::Database(e)
            })
    }

    /// List all categories (flat list), cached
    pub async fn list(&self) -> Result<Vec<CategoryResponseDto>> {
        self.cache
            .get_or_compute(CacheKey::CategoryList, self.cache.default_ttl(), || async {
                let rows = self.fetch_rows().await?;
                Ok::<_, AppError>(rows.into_iter().map(CategoryResponseDto::from).collect())
            })
            .await
    }

    /// List all categories as a forest, cached
    pub async fn list_tree(&self) -> Result<Vec<CategoryNode>> {
        self.cache
            .get_or_compute(CacheKey::CategoryTree, self.cache.default_ttl(), || async {
                let rows = self.fetch_rows().await?;
                Ok::<_, AppError>(CategoryNode::build_forest(rows))
            })
            .await
    }

    /// Get category metadata by id
    pub async fn get(&self, id: i64) -> Result<CategoryResponseDto> {
        let query = format!(
            "{} WHERE c.id = $1 GROUP BY c.id",
            CATEGORY_WITH_COUNT_SELECT
        );

        let row = sqlx::query_as::<_, CategoryWithCount>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get category: {:?}", e);
                AppError::Database(e)
            })?;

        row.map(CategoryResponseDto::from)
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))
    }

    async fn parent_map(&self) -> Result<HashMap<i64, Option<i64>>> {
        let rows: Vec<(i64, Option<i64>)> =
            sqlx::query_as("SELECT id, parent_id FROM categories")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to load category parents: {:?}", e);
                    AppError::Database(e)
                })?;

        Ok(rows.into_iter().collect())
    }

    /// Reject unknown parents and parents that would close a loop
    async fn check_parent(&self, id: Option<i64>, parent_id: Option<i64>) -> Result<()> {
        let Some(parent_id) = parent_id else {
            return Ok(());
        };

        let parents = self.parent_map().await?;
        if !parents.contains_key(&parent_id) {
            return Err(AppError::Validation(format!(
                "Parent category {} does not exist",
                parent_id
            )));
        }

        if let Some(id) = id {
            if would_create_cycle(&parents, id, parent_id) {
                return Err(AppError::Validation(
                    "A category cannot be placed under itself or its descendants".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Create a new category
    pub async fn create(&self, dto: CreateCategoryDto) -> Result<CategoryResponseDto> {
        let name = dto.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Category name is required".to_string()));
        }
        self.check_parent(None, dto.parent_id).await?;

        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, parent_id, display_order, icon_url, icon)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, parent_id, name, display_order, icon_url, icon, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(dto.parent_id)
        .bind(dto.display_order)
        .bind(&dto.icon_url)
        .bind(&dto.icon)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| handle_db_error(e, "Category already exists"))?;

        self.cache
            .invalidate_after_write(CacheTag::Categories, Some(category.id))
            .await;

        Ok(CategoryResponseDto::from(CategoryWithCount {
            category,
            website_count: 0,
        }))
    }

    /// Replace a category's fields
    pub async fn update(&self, id: i64, dto: UpdateCategoryDto) -> Result<CategoryResponseDto> {
        let name = dto.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Category name is required".to_string()));
        }
        self.check_parent(Some(id), dto.parent_id).await?;

        let updated = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = $1, parent_id = $2, display_order = $3, icon_url = $4, icon = $5,
                updated_at = NOW()
            WHERE id = $6
            RETURNING id, parent_id, name, display_order, icon_url, icon, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(dto.parent_id)
        .bind(dto.display_order)
        .bind(&dto.icon_url)
        .bind(&dto.icon)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| handle_db_error(e, "Category already exists"))?
        .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))?;

        self.cache
            .invalidate_after_write(CacheTag::Categories, Some(updated.id))
            .await;

        self.get(id).await
    }

    /// Apply new display positions, one row at a time
    pub async fn reorder(&self, dto: ReorderCategoriesDto) -> Result<()> {
        let parents = self.parent_map().await?;
        if let Some(missing) = dto.items.iter().find(|item| !parents.contains_key(&item.id)) {
            return Err(AppError::NotFound(format!(
                "Category {} not found",
                missing.id
            )));
        }

        for item in &dto.items {
            sqlx::query("UPDATE categories SET display_order = $1, updated_at = NOW() WHERE id = $2")
                .bind(item.display_order)
                .bind(item.id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to reorder category {}: {:?}", item.id, e);
                    AppError::Database(e)
                })?;
        }

        self.cache
            .invalidate_after_write(CacheTag::Categories, None)
            .await;

        tracing::info!("Reordered {} categories", dto.items.len());
        Ok(())
    }

    /// Delete a category that no website or sub-category references
    pub async fn delete(&self, id: i64) -> Result<()> {
        let (websites, children): (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM websites WHERE category_id = $1),
                (SELECT COUNT(*) FROM categories WHERE parent_id = $1)
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        if websites > 0 || children > 0 {
            return Err(AppError::Conflict(format!(
                "Category {} still has {} websites and {} sub-categories",
                id, websites, children
            )));
        }

        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| handle_db_error(e, "Category is still referenced"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Category {} not found", id)));
        }

        self.cache
            .invalidate_after_write(CacheTag::Categories, Some(id))
            .await;

        Ok(())
    }
}
