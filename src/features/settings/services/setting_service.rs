use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::settings::dtos::{check_value, keys, HomeSettingsView, UpsertSettingDto};
use crate::features::settings::models::Setting;
use crate::shared::cache::{CacheKey, CacheOrchestrator, CacheTag};

/// Service for settings
pub struct SettingService {
    pool: PgPool,
    cache: CacheOrchestrator,
}

impl SettingService {
    pub fn new(pool: PgPool, cache: CacheOrchestrator) -> Self {
        Self { pool, cache }
    }

    /// Stored rows for the given keys
    pub async fn fetch(&self, keys: &[&str]) -> Result<Vec<Setting>> {
        let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();

        sqlx::query_as::<_, Setting>(
            "SELECT key, value, updated_at FROM settings WHERE key = ANY($1)",
        )
        .bind(&keys)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load settings: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Home settings view, cached
    pub async fn home(&self) -> Result<HomeSettingsView> {
        self.cache
            .get_or_compute(CacheKey::HomeSettings, self.cache.default_ttl(), || async {
                let rows = self.fetch(&keys::ALL).await?;
                HomeSettingsView::assemble(&rows)
            })
            .await
    }

    /// Every stored setting, for the admin panel
    pub async fn list_all(&self) -> Result<Vec<Setting>> {
        sqlx::query_as::<_, Setting>("SELECT key, value, updated_at FROM settings ORDER BY key")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    /// Insert or overwrite one setting
    pub async fn upsert(&self, dto: UpsertSettingDto) -> Result<Setting> {
        check_value(&dto.key, &dto.value)?;

        let setting = sqlx::query_as::<_, Setting>(
            r#"
            INSERT INTO settings (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
            RETURNING key, value, updated_at
            "#,
        )
        .bind(&dto.key)
        .bind(&dto.value)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to upsert setting '{}': {:?}", dto.key, e);
            AppError::Database(e)
        })?;

        self.cache
            .invalidate_after_write(CacheTag::Settings, None)
            .await;

        Ok(setting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{is_cached, test_cache};

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs a Postgres server at DATABASE_URL"]
    async fn test_upsert_drops_cached_home_settings(pool: PgPool) {
        let (store, cache) = test_cache();
        let service = SettingService::new(pool, cache);

        let before = service.home().await.unwrap();
        assert!(!before.show_recommended);
        assert!(is_cached(&store, CacheKey::HomeSettings).await);

        service
            .upsert(UpsertSettingDto {
                key: keys::HOME_SHOW_RECOMMENDED.to_string(),
                value: "true".to_string(),
            })
            .await
            .unwrap();
        assert!(!is_cached(&store, CacheKey::HomeSettings).await);

        let after = service.home().await.unwrap();
        assert!(after.show_recommended);
    }
}
