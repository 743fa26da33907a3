//! 商品橱窗仓储

use async_trait::async_trait;
use sqlx::PgPool;

use super::traits::CatalogRepositoryTrait;
use crate::models::CatalogItem;
use game_shared::error::Result;

/// 商品橱窗仓储（只读）
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepositoryTrait for PgCatalogRepository {
    async fn find(&self, app_id: i64, item: &str) -> Result<Option<CatalogItem>> {
        let found = sqlx::query_as::<_, CatalogItem>(
            r#"
            SELECT app_id, item, title, photo_url, price, item_id
            FROM showcase
            WHERE app_id = $1 AND item = $2
            "#,
        )
        .bind(app_id)
        .bind(item)
        .fetch_optional(&self.pool)
        .await?;

        Ok(found)
    }
}
