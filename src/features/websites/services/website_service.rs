use std::collections::HashMap;

use sqlx::{PgPool, Postgres, Transaction};

use crate::core::error::{handle_db_error, AppError, Result};
use crate::features::categories::models::Category;
use crate::features::websites::dtos::{
    CreateWebsiteDto, RecommendedWebsitesView, UpdateWebsiteDto, WebsiteResponseDto,
};
use crate::features::websites::models::{Website, WebsiteTag};
use crate::shared::cache::{CacheKey, CacheOrchestrator, CacheTag};
use crate::shared::types::PaginationQuery;

const WEBSITE_COLUMNS: &str =
    "id, name, url, description, category_id, display_order, is_recommended, created_at, updated_at";

/// Sorted, de-duplicated copy of the requested tag ids
fn normalize_tag_ids(tag_ids: &[i64]) -> Vec<i64> {
    let mut ids = tag_ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Trimmed website name; blank names are rejected before anything is written
fn website_name(raw: &str) -> Result<&str> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Website name is required".to_string()));
    }
    Ok(name)
}

fn group_tag_ids(links: Vec<WebsiteTag>) -> HashMap<i64, Vec<i64>> {
    let mut grouped: HashMap<i64, Vec<i64>> = HashMap::new();
    for link in links {
        grouped.entry(link.website_id).or_default().push(link.tag_id);
    }
    grouped
}

/// Service for website operations
pub struct WebsiteService {
    pool: PgPool,
    cache: CacheOrchestrator,
}

impl WebsiteService {
    pub fn new(pool: PgPool, cache: CacheOrchestrator) -> Self {
        Self { pool, cache }
    }

    /// Every website, ordered by `display_order`
    pub async fn fetch_all(&self) -> Result<Vec<Website>> {
        sqlx::query_as::<_, Website>(&format!(
            "SELECT {} FROM websites ORDER BY display_order, id",
            WEBSITE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list websites: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>> {
        sqlx::query_as::<_, Category>(
            "SELECT id, parent_id, name, display_order, icon_url, icon, created_at, updated_at FROM categories",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list categories: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn fetch_tag_links(&self, website_ids: &[i64]) -> Result<HashMap<i64, Vec<i64>>> {
        if website_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let links = sqlx::query_as::<_, WebsiteTag>(
            "SELECT website_id, tag_id FROM website_tags WHERE website_id = ANY($1) ORDER BY tag_id",
        )
        .bind(website_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(group_tag_ids(links))
    }

    async fn with_tags(&self, websites: Vec<Website>) -> Result<Vec<WebsiteResponseDto>> {
        let ids: Vec<i64> = websites.iter().map(|w| w.id).collect();
        let mut tags = self.fetch_tag_links(&ids).await?;

        Ok(websites
            .into_iter()
            .map(|w| {
                let tag_ids = tags.remove(&w.id).unwrap_or_default();
                WebsiteResponseDto::new(w, tag_ids)
            })
            .collect())
    }

    /// Recommended websites view, cached
    pub async fn recommended(&self) -> Result<RecommendedWebsitesView> {
        self.cache
            .get_or_compute(
                CacheKey::RecommendedWebsites,
                self.cache.default_ttl(),
                || async {
                    let websites = self.fetch_all().await?;
                    let categories = self.fetch_categories().await?;
                    Ok::<_, AppError>(RecommendedWebsitesView::assemble(websites, &categories))
                },
            )
            .await
    }

    /// Websites filed directly under a category
    pub async fn fetch_by_category(&self, category_id: i64) -> Result<Vec<WebsiteResponseDto>> {
        if !self.category_exists(category_id).await? {
            return Err(AppError::NotFound(format!(
                "Category {} not found",
                category_id
            )));
        }

        let websites = sqlx::query_as::<_, Website>(&format!(
            "SELECT {} FROM websites WHERE category_id = $1 ORDER BY display_order, id",
            WEBSITE_COLUMNS
        ))
        .bind(category_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        self.with_tags(websites).await
    }

    /// Paginated admin listing, newest first
    pub async fn list(&self, params: &PaginationQuery) -> Result<(Vec<WebsiteResponseDto>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM websites")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let websites = sqlx::query_as::<_, Website>(&format!(
            "SELECT {} FROM websites ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2",
            WEBSITE_COLUMNS
        ))
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok((self.with_tags(websites).await?, total))
    }

    /// Get website by id
    pub async fn get(&self, id: i64) -> Result<WebsiteResponseDto> {
        let website = sqlx::query_as::<_, Website>(&format!(
            "SELECT {} FROM websites WHERE id = $1",
            WEBSITE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound(format!("Website {} not found", id)))?;

        let mut tags = self.fetch_tag_links(&[id]).await?;
        let tag_ids = tags.remove(&id).unwrap_or_default();
        Ok(WebsiteResponseDto::new(website, tag_ids))
    }

    async fn category_exists(&self, category_id: i64) -> Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
            .bind(category_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    /// Reject unknown category and tag references before writing
    async fn check_references(&self, category_id: i64, tag_ids: &[i64]) -> Result<()> {
        if !self.category_exists(category_id).await? {
            return Err(AppError::Validation(format!(
                "Category {} does not exist",
                category_id
            )));
        }

        if tag_ids.is_empty() {
            return Ok(());
        }

        let known: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tags WHERE id = ANY($1)")
            .bind(tag_ids)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if known != tag_ids.len() as i64 {
            return Err(AppError::Validation(
                "One or more tags do not exist".to_string(),
            ));
        }

        Ok(())
    }

    async fn replace_tags(
        tx: &mut Transaction<'_, Postgres>,
        website_id: i64,
        tag_ids: &[i64],
    ) -> Result<()> {
        sqlx::query("DELETE FROM website_tags WHERE website_id = $1")
            .bind(website_id)
            .execute(&mut **tx)
            .await
            .map_err(AppError::Database)?;

        if !tag_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO website_tags (website_id, tag_id)
                SELECT $1, id FROM UNNEST($2::BIGINT[]) AS id
                "#,
            )
            .bind(website_id)
            .bind(tag_ids)
            .execute(&mut **tx)
            .await
            .map_err(|e| handle_db_error(e, "Website already has this tag"))?;
        }

        Ok(())
    }

    /// Create a website together with its tag links
    pub async fn create(&self, dto: CreateWebsiteDto) -> Result<WebsiteResponseDto> {
        let name = website_name(&dto.name)?;
        let tag_ids = normalize_tag_ids(&dto.tag_ids);
        self.check_references(dto.category_id, &tag_ids).await?;

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let website = sqlx::query_as::<_, Website>(&format!(
            r#"
            INSERT INTO websites (name, url, description, category_id, display_order, is_recommended)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            WEBSITE_COLUMNS
        ))
        .bind(name)
        .bind(&dto.url)
        .bind(&dto.description)
        .bind(dto.category_id)
        .bind(dto.display_order)
        .bind(dto.is_recommended)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| handle_db_error(e, "Website already exists"))?;

        Self::replace_tags(&mut tx, website.id, &tag_ids).await?;
        tx.commit().await.map_err(AppError::Database)?;

        self.cache
            .invalidate_after_write(CacheTag::Websites, Some(website.id))
            .await;

        Ok(WebsiteResponseDto::new(website, tag_ids))
    }

    /// Replace a website's fields and tag set
    pub async fn update(&self, id: i64, dto: UpdateWebsiteDto) -> Result<WebsiteResponseDto> {
        let name = website_name(&dto.name)?;
        let tag_ids = normalize_tag_ids(&dto.tag_ids);
        self.check_references(dto.category_id, &tag_ids).await?;

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let website = sqlx::query_as::<_, Website>(&format!(
            r#"
            UPDATE websites
            SET name = $1, url = $2, description = $3, category_id = $4,
                display_order = $5, is_recommended = $6, updated_at = NOW()
            WHERE id = $7
            RETURNING {}
            "#,
            WEBSITE_COLUMNS
        ))
        .bind(name)
        .bind(&dto.url)
        .bind(&dto.description)
        .bind(dto.category_id)
        .bind(dto.display_order)
        .bind(dto.is_recommended)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| handle_db_error(e, "Website already exists"))?
        .ok_or_else(|| AppError::NotFound(format!("Website {} not found", id)))?;

        Self::replace_tags(&mut tx, website.id, &tag_ids).await?;
        tx.commit().await.map_err(AppError::Database)?;

        self.cache
            .invalidate_after_write(CacheTag::Websites, Some(website.id))
            .await;

        Ok(WebsiteResponseDto::new(website, tag_ids))
    }

    /// Delete a website; its tag links cascade
    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM websites WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Website {} not found", id)));
        }

        self.cache
            .invalidate_after_write(CacheTag::Websites, Some(id))
            .await;

        Ok(())
    }
}
