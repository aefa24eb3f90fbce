use sqlx::PgPool;

use crate::core::error::{handle_db_error, AppError, Result};
use crate::features::tags::dtos::{
    normalize_tag_name, CreateTagDto, TagOrder, TagWithCountDto, UpdateTagDto,
};
use crate::features::tags::models::Tag;
use crate::features::websites::models::WebsiteTag;
use crate::shared::cache::{CacheKey, CacheOrchestrator, CacheTag};

const TAG_COLUMNS: &str = "id, name, color, description, created_at, updated_at";

fn cache_key(order: TagOrder) -> CacheKey {
    match order {
        TagOrder::NameAsc => CacheKey::TagsByName,
        TagOrder::CreatedDesc => CacheKey::TagsByCreated,
    }
}

/// Service for tag operations
pub struct TagService {
    pool: PgPool,
    cache: CacheOrchestrator,
}

impl TagService {
    pub fn new(pool: PgPool, cache: CacheOrchestrator) -> Self {
        Self { pool, cache }
    }

    async fn fetch_tags(&self) -> Result<Vec<Tag>> {
        sqlx::query_as::<_, Tag>(&format!("SELECT {} FROM tags ORDER BY id", TAG_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list tags: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn fetch_links(&self) -> Result<Vec<WebsiteTag>> {
        sqlx::query_as::<_, WebsiteTag>("SELECT website_id, tag_id FROM website_tags")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list website tags: {:?}", e);
                AppError::Database(e)
            })
    }

    /// Tags with usage counts in the requested order, cached per order
    pub async fn list(&self, order: TagOrder) -> Result<Vec<TagWithCountDto>> {
        self.cache
            .get_or_compute(cache_key(order), self.cache.default_ttl(), || async {
                let tags = self.fetch_tags().await?;
                let links = self.fetch_links().await?;
                Ok::<_, AppError>(TagWithCountDto::assemble(tags, &links, order))
            })
            .await
    }

    async fn usage_count(&self, id: i64) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM website_tags WHERE tag_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn name_taken(&self, name: &str, exclude_id: Option<i64>) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM tags WHERE name = $1 AND ($2::BIGINT IS NULL OR id <> $2))",
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    /// Create a tag; the name is trimmed and must be unique
    pub async fn create(&self, dto: CreateTagDto) -> Result<TagWithCountDto> {
        let name = normalize_tag_name(&dto.name)?;
        if self.name_taken(&name, None).await? {
            return Err(AppError::Validation(format!("Tag '{}' already exists", name)));
        }

        let tag = sqlx::query_as::<_, Tag>(&format!(
            "INSERT INTO tags (name, color, description) VALUES ($1, $2, $3) RETURNING {}",
            TAG_COLUMNS
        ))
        .bind(&name)
        .bind(&dto.color)
        .bind(&dto.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| handle_db_error(e, &format!("Tag '{}' already exists", name)))?;

        self.cache
            .invalidate_after_write(CacheTag::Tags, Some(tag.id))
            .await;

        // A new tag has no websites yet
        Ok(TagWithCountDto::with_count(tag, 0))
    }

    /// Replace a tag's fields; the response carries the tag's current usage count
    pub async fn update(&self, id: i64, dto: UpdateTagDto) -> Result<TagWithCountDto> {
        let name = normalize_tag_name(&dto.name)?;
        if self.name_taken(&name, Some(id)).await? {
            return Err(AppError::Validation(format!("Tag '{}' already exists", name)));
        }

        let tag = sqlx::query_as::<_, Tag>(&format!(
            r#"
            UPDATE tags
            SET name = $1, color = $2, description = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING {}
            "#,
            TAG_COLUMNS
        ))
        .bind(&name)
        .bind(&dto.color)
        .bind(&dto.description)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| handle_db_error(e, &format!("Tag '{}' already exists", name)))?
        .ok_or_else(|| AppError::NotFound(format!("Tag {} not found", id)))?;

        self.cache
            .invalidate_after_write(CacheTag::Tags, Some(tag.id))
            .await;

        let website_count = self.usage_count(tag.id).await?;
        Ok(TagWithCountDto::with_count(tag, website_count))
    }

    /// Delete a tag; its website links go with it
    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Tag {} not found", id)));
        }

        self.cache
            .invalidate_after_write(CacheTag::Tags, Some(id))
            .await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{is_cached, test_cache};

    async fn seed_website(pool: &PgPool, tag_id: i64, n: usize) {
        let category_id: i64 =
            sqlx::query_scalar("INSERT INTO categories (name) VALUES ($1) RETURNING id")
                .bind(format!("Category {}", n))
                .fetch_one(pool)
                .await
                .unwrap();
        let website_id: i64 = sqlx::query_scalar(
            "INSERT INTO websites (name, url, category_id) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(format!("Site {}", n))
        .bind(format!("https://site-{}.example.com", n))
        .bind(category_id)
        .fetch_one(pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO website_tags (website_id, tag_id) VALUES ($1, $2)")
            .bind(website_id)
            .bind(tag_id)
            .execute(pool)
            .await
            .unwrap();
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs a Postgres server at DATABASE_URL"]
    async fn test_update_reports_usage_count_and_drops_lists(pool: PgPool) {
        let (store, cache) = test_cache();
        let service = TagService::new(pool.clone(), cache);

        let created = service
            .create(CreateTagDto {
                name: "rust".to_string(),
                color: None,
                description: None,
            })
            .await
            .unwrap();
        assert_eq!(created.website_count, 0);

        seed_website(&pool, created.id, 1).await;
        seed_website(&pool, created.id, 2).await;

        let listed = service.list(TagOrder::NameAsc).await.unwrap();
        service.list(TagOrder::CreatedDesc).await.unwrap();
        assert!(is_cached(&store, CacheKey::TagsByName).await);
        assert!(is_cached(&store, CacheKey::TagsByCreated).await);

        let updated = service
            .update(
                created.id,
                UpdateTagDto {
                    name: "  Rust ".to_string(),
                    color: Some("#b7410e".to_string()),
                    description: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Rust");
        assert_eq!(updated.website_count, 2);
        assert_eq!(listed[0].website_count, updated.website_count);
        assert!(!is_cached(&store, CacheKey::TagsByName).await);
        assert!(!is_cached(&store, CacheKey::TagsByCreated).await);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs a Postgres server at DATABASE_URL"]
    async fn test_duplicate_name_rejected_and_cache_kept(pool: PgPool) {
        let (store, cache) = test_cache();
        let service = TagService::new(pool, cache);
        let dto = CreateTagDto {
            name: "web".to_string(),
            color: None,
            description: None,
        };

        service.create(dto.clone()).await.unwrap();
        service.list(TagOrder::NameAsc).await.unwrap();

        let again = service.create(dto).await;
        assert!(matches!(again, Err(AppError::Validation(_))));
        assert!(is_cached(&store, CacheKey::TagsByName).await);
    }
}
